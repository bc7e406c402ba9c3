//! Convert command
//!
//! Usage: qstate convert --schema <FILE> --values <JSON> [--merged]
//!
//! `--values` is one JSON object of field values, or an array of objects
//! (one per group). Each value is read as its field's declared type.

use clap::Args;
use serde_json::{json, Value as Json};
use std::path::PathBuf;

use qstate_core::{RawQuery, Session, TypedRecord, Value};

use super::open_session;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Schema file (YAML)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Field values as JSON
    #[arg(short, long)]
    pub values: String,

    /// Fold all groups into a single mapping
    #[arg(short, long)]
    pub merged: bool,
}

/// Execute convert command
pub fn execute(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(&args.schema, "")?;
    let input: Json = serde_json::from_str(&args.values)?;

    let raw = match input {
        Json::Array(items) => {
            let records = items
                .iter()
                .map(|item| typed_record(&session, item))
                .collect::<Result<Vec<_>, _>>()?;
            session.convert(records, args.merged)?
        }
        other => session.convert(typed_record(&session, &other)?, args.merged)?,
    };

    let mut query = RawQuery::new();
    for record in &raw {
        query.merge(&record.clone().into());
    }

    let out = json!({
        "records": raw,
        "query": query.to_query_string(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn typed_record(session: &Session, item: &Json) -> Result<TypedRecord, Box<dyn std::error::Error>> {
    let Json::Object(fields) = item else {
        return Err(format!("expected a JSON object of field values, got {}", item).into());
    };

    let index = session.groups().index();
    let mut record = TypedRecord::new();
    for (name, json) in fields {
        // Unknown names are passed through so convert reports them
        let value = match index.get(name) {
            Some(entry) => Value::from_json(&entry.spec.type_name, json)?,
            None => Value::Json(json.clone()),
        };
        record.insert(name.clone(), value);
    }
    Ok(record)
}
