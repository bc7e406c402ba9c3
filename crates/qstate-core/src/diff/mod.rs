//! Query snapshot diff engine.
//!
//! Compares two raw query snapshots and reports which top-level fields
//! changed.
//!
//! ## Entry point
//!
//! ```
//! use qstate_core::diff::diff;
//! use qstate_core::RawQuery;
//!
//! let changed = diff(&RawQuery::parse("page=1"), &RawQuery::parse("page=2&q=x"));
//! assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec!["page", "q"]);
//! ```
//!
//! ## Guarantees
//!
//! - **Raw equality**: values are compared as strings; a field whose raw
//!   text is unchanged is never reported.
//! - **Absence is a value**: a missing key differs from `""`.
//! - **Symmetry**: `diff(a, b) == diff(b, a)`.
//! - **Determinism**: output is a sorted, deduplicated set.

pub mod engine;
pub mod model;
pub mod summary;

pub use engine::{diff, diff_detailed};
pub use model::{ChangeKind, FieldChange};
pub use summary::render_summary;
