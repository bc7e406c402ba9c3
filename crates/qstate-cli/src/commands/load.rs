//! Load command
//!
//! Usage: qstate load --schema <FILE> --query <SEARCH>

use clap::Args;
use serde_json::{Map, Value as Json};
use std::path::PathBuf;

use super::open_session;

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Schema file (YAML)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Query string, with or without the leading `?`
    #[arg(short, long, default_value = "")]
    pub query: String,
}

/// Execute load command
pub fn execute(args: LoadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(&args.schema, &args.query)?;
    let records = session.load()?;

    // One JSON object per group, keyed by group name
    let mut out = Map::new();
    for (group, record) in session.groups().groups().iter().zip(&records) {
        let fields: Map<String, Json> = record
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        out.insert(group.name().to_string(), Json::Object(fields));
    }

    println!("{}", serde_json::to_string_pretty(&Json::Object(out))?);
    Ok(())
}
