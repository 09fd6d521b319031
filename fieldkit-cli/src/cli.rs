//! CLI definition for the Fieldkit command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fieldkit - declarative typed fields.
///
/// Reads a document of post types, taxonomies and settings pages, each with
/// the fields edited on it, and renders, sanitizes, validates and stores
/// field values against the configured storage backend.
#[derive(Parser, Debug)]
#[command(name = "fieldkit")]
#[command(version)]
#[command(about = "Check, render and save declarative field documents")]
#[command(
    long_about = "Fieldkit reads a YAML or JSON document declaring resources and their fields.\n\n\
    Values are stored in memory (the default) or as YAML files, chosen in fieldkit.toml / \
    fieldkit.yaml / fieldkit.json or with environment variables.\n\n\
    Environment variables:\n  \
    FIELDKIT_STORAGE__BACKEND  memory or yaml\n  \
    FIELDKIT_STORAGE__PATH     Root directory of the YAML backend\n  \
    FIELDKIT_LOG_LEVEL         Log filter when RUST_LOG is not set"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Read configuration from this file instead of discovering one
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a document and report field name collisions
    Check {
        /// Path to a .yaml, .yml or .json document
        document: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the registered field types
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the form of one resource with its stored values
    Render {
        /// Path to a .yaml, .yml or .json document
        document: PathBuf,
        /// Resource id inside the document
        resource: String,
        /// Post or term id; settings pages default to the resource id
        #[arg(long)]
        id: Option<String>,
        /// Output markup and assets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sanitize, validate and store a submission for one resource
    ///
    /// Exits with status 2 when any field fails validation.
    Save {
        /// Path to a .yaml, .yml or .json document
        document: PathBuf,
        /// Resource id inside the document
        resource: String,
        /// Post or term id; settings pages default to the resource id
        #[arg(long)]
        id: Option<String>,
        /// Submitted values as a JSON object, or @path to read one from a file
        #[arg(long, value_name = "JSON")]
        input: String,
        /// Output the save report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read one stored field value
    Get {
        /// Field name
        name: String,
        /// Post id, term id or settings page id
        id: String,
        /// post, term or settings; defaults to the configured context type
        #[arg(long, value_name = "TYPE")]
        context_type: Option<String>,
        /// Returned when nothing is stored; parsed as JSON, else taken as text
        #[arg(long, value_name = "VALUE")]
        default: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_save_with_global_flags() {
        let cli = Cli::parse_from([
            "fieldkit",
            "save",
            "store.yaml",
            "product",
            "--id",
            "42",
            "--input",
            r#"{"price": 3}"#,
            "--debug",
        ]);
        assert!(cli.debug);
        match cli.command {
            Commands::Save {
                resource, id, input, json, ..
            } => {
                assert_eq!(resource, "product");
                assert_eq!(id.as_deref(), Some("42"));
                assert_eq!(input, r#"{"price": 3}"#);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_get_options() {
        let cli = Cli::parse_from([
            "fieldkit",
            "--config",
            "custom.toml",
            "get",
            "currency",
            "store-settings",
            "--context-type",
            "settings",
            "--default",
            "USD",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Get { ref context_type, ref default, .. }
                if context_type.as_deref() == Some("settings") && default.as_deref() == Some("USD")
        ));
    }

    #[test]
    fn save_requires_input() {
        assert!(Cli::try_parse_from(["fieldkit", "save", "doc.yaml", "product"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
