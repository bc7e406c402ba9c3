pub mod convert;
pub mod diff;
pub mod load;

use std::path::Path;
use std::sync::Arc;

use qstate_core::{Environment, MemoryHistory, SchemaConfig, Session, TypeRegistry};

/// Session over a one-entry in-memory history seeded with `search`
pub fn open_session(schema_path: &Path, search: &str) -> Result<Session, Box<dyn std::error::Error>> {
    let schema = SchemaConfig::from_path(schema_path)?;
    let history = Arc::new(MemoryHistory::standalone(search));

    let session = Session::init(
        schema.to_groups()?,
        Environment::memory(&history),
        schema.session_config(TypeRegistry::with_builtins()),
    )?;
    Ok(session)
}
