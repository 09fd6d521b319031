//! Loading documents and opening storage for a command.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use fieldkit::{Context, ContextRouter, ContextType, Document, ResourceDecl, ResourceKind, ShapeValidator};
use fieldkit_config::{ConfigProvider, FieldkitConfig, StorageBackend};
use serde_json::Value;
use tracing::{debug, warn};

/// Configuration from `path`, or discovered in the working directory.
pub fn load_config(path: Option<&Path>) -> Result<FieldkitConfig> {
    let provider = match path {
        Some(path) => ConfigProvider::new().with_file(path),
        None => ConfigProvider::new(),
    };
    Ok(provider.load()?)
}

/// Parse a document. `.json` files go through the shape validator first;
/// anything else is read as YAML.
pub fn load_document(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        Document::from_json(&source, &ShapeValidator)
    } else {
        Document::from_yaml_str(&source)
    };
    document.with_context(|| format!("invalid document {}", path.display()))
}

/// The router for the configured backend.
pub fn open_router(config: &FieldkitConfig) -> ContextRouter {
    match config.storage.backend {
        StorageBackend::Memory => {
            debug!("using in-memory storage");
            ContextRouter::in_memory()
        }
        StorageBackend::Yaml => {
            debug!(path = %config.storage.path.display(), "using yaml storage");
            ContextRouter::yaml(&config.storage.path)
        }
    }
}

/// Warn when values written now will not outlive the process.
pub fn warn_if_ephemeral(config: &FieldkitConfig) {
    if config.storage.backend == StorageBackend::Memory {
        warn!("storage backend is memory; saved values are discarded on exit");
    }
}

/// Where the values of `resource` live. Settings pages are their own
/// context; post types and taxonomies need the object id.
pub fn resource_context(kind: ResourceKind, resource: &ResourceDecl, id: Option<&str>) -> Result<Context> {
    match (kind.context_type(), id) {
        (ContextType::Settings, id) => Ok(Context::settings(id.unwrap_or(resource.id()))),
        (context_type, Some(id)) => Ok(Context::new(context_type, id)),
        (_, None) => bail!("--id is required for {kind} '{}'", resource.id()),
    }
}

/// A command-line value: JSON when it parses, otherwise plain text.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Read `--input`: inline JSON, or `@path` naming a JSON file.
pub fn read_input(raw: &str) -> Result<String> {
    match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read input {path}")),
        None => Ok(raw.to_string()),
    }
}
