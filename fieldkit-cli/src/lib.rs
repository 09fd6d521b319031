//! Fieldkit CLI library.
//!
//! Each subcommand lives in its own module and returns the process exit
//! code; [`run`] dispatches a parsed [`Commands`] and turns errors into
//! [`EXIT_ERROR`].

pub mod check;
pub mod cli;
pub mod get;
pub mod project;
pub mod render;
pub mod save;
pub mod table;
pub mod types;

pub use cli::{Cli, Commands};

use fieldkit_config::FieldkitConfig;

/// Command succeeded
pub const EXIT_OK: i32 = 0;
/// Command failed: bad document, bad configuration, or a storage failure
pub const EXIT_ERROR: i32 = 1;
/// `save` stored what it could but some fields failed validation
pub const EXIT_INVALID: i32 = 2;

/// Run `command` and map the outcome to an exit code.
pub fn run(command: Commands, config: &FieldkitConfig) -> i32 {
    let result = match command {
        Commands::Check { document, json } => check::run_check(&document, json),
        Commands::Types { json } => types::run_types(json),
        Commands::Render {
            document,
            resource,
            id,
            json,
        } => render::run_render(config, &document, &resource, id.as_deref(), json),
        Commands::Save {
            document,
            resource,
            id,
            input,
            json,
        } => save::run_save(config, &document, &resource, id.as_deref(), &input, json),
        Commands::Get {
            name,
            id,
            context_type,
            default,
        } => get::run_get(config, &name, &id, context_type.as_deref(), default.as_deref()),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    }
}
