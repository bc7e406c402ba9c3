//! Core types shared across qstate facilities
//!
//! This crate provides foundational types used by the codec, the
//! notification layer and the logging facility:
//!
//! - **Correlation types**: SessionId, SubscriptionId, ListenerId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{ListenerId, SessionId, SubscriptionId};
