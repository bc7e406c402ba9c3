//! Logging for sessions, codecs and type handlers
//!
//! Everything goes through `tracing`. Binaries pick an output profile once
//! with [`init`]; library code never installs a subscriber.
//!
//! ```rust
//! use qstate_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Operation boundaries use `log_op_start!`, `log_op_end!` and
//! `log_op_error!`. A type handler that had to use the field default logs
//! it with `log_fallback!`. Tests install [`init_test_capture`] and assert
//! on the recorded events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
