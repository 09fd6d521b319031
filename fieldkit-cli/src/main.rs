//! Fieldkit CLI - check, render and save declarative field documents.
//!
//! Commands:
//! - `fieldkit check <document>`: Validate a document and report name collisions
//! - `fieldkit types`: List registered field types
//! - `fieldkit render <document> <resource> [--id]`: Print a resource's form
//! - `fieldkit save <document> <resource> [--id] --input <json>`: Store a submission
//! - `fieldkit get <name> <id> [--context-type] [--default]`: Read one stored value
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 2: `save` found invalid fields

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldkit_cli::project::load_config;
use fieldkit_cli::{run, Cli, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let filter = if cli.debug {
        EnvFilter::new("fieldkit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(run(cli.command, &config));
}
