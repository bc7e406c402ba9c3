//! Diff command
//!
//! Usage: qstate diff <OLD> <NEW> [--json]

use clap::Args;

use qstate_core::diff::render_summary;
use qstate_core::{diff_detailed, RawQuery};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous query string
    pub old: String,

    /// Current query string
    pub new: String,

    /// Print the changes as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let changes = diff_detailed(&RawQuery::parse(&args.old), &RawQuery::parse(&args.new));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else {
        print!("{}", render_summary(&changes));
    }
    Ok(())
}
