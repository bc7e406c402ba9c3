//! qstate CLI
//!
//! Command-line interface for inspecting typed query state

use clap::{Parser, Subcommand};
use qstate_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "qstate")]
#[command(about = "qstate - Typed URL query state", long_about = None)]
struct Cli {
    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a query string into typed records
    Load(commands::load::LoadArgs),
    /// Turn typed JSON values into raw query parameters
    Convert(commands::convert::ConvertArgs),
    /// Show which fields changed between two query strings
    Diff(commands::diff::DiffArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Load(args) => commands::load::execute(args),
        Commands::Convert(args) => commands::convert::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
