//! qstate Core - typed URL query state
//!
//! This crate keeps application state in the URL query string, including:
//! - A pluggable type registry of parse/stringify handlers with per-type options
//! - A codec between raw query snapshots and typed, grouped records
//! - A diff engine over raw snapshots
//! - Change notification that fires each touched group's callback once
//! - Session lifecycle bound to navigation and push-state events
//! - In-memory history and a publish/subscribe channel for hosts without a browser
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use qstate_core::{Environment, Group, MemoryHistory, Session, SessionConfig, Value};
//!
//! let history = Arc::new(MemoryHistory::standalone("?page=2"));
//! let session = Session::init(
//!     vec![Group::silent("pager").field("page", "Int", 1i64)],
//!     Environment::memory(&history),
//!     SessionConfig::new(),
//! )
//! .unwrap();
//!
//! let records = session.load().unwrap();
//! assert_eq!(records[0]["page"], Value::Int(2));
//! ```

pub mod codec;
pub mod diff;
pub mod errors;
pub mod group;
pub mod history;
pub mod logging_facility;
pub mod notify;
pub mod options;
pub mod pubsub;
pub mod query;
pub mod schema;
pub mod session;
pub mod types;
pub mod value;

// Used by the exported logging macros
#[doc(hidden)]
pub use qstate_core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use codec::{ConvertInput, QueryCodec, RawRecord, TypedRecord};
pub use diff::{diff, diff_detailed, ChangeKind, FieldChange};
pub use errors::{ExError, ExErrorKind, QStateError, Result};
pub use group::{FieldSpec, Group, GroupSet};
pub use history::{Environment, MemoryHistory, NavigationEvents, QuerySource};
pub use notify::Notification;
pub use options::{Options, TypeOptions};
pub use pubsub::PubSub;
pub use query::RawQuery;
pub use schema::SchemaConfig;
pub use session::{PushPolicy, Session, SessionConfig};
pub use types::{TypeDef, TypeHandler, TypeRegistry};
pub use value::Value;
