//! Error types for document handling, rendering and saving

use fieldkit_fields::FieldsError;
use fieldkit_store::StoreError;
use thiserror::Error;

use crate::document::ResourceKind;

/// Result type for fieldkit operations
pub type Result<T> = std::result::Result<T, FieldkitError>;

/// Errors surfaced to the host. Per-field validation failures are not errors;
/// they are collected in a [`SaveReport`](crate::SaveReport).
#[derive(Debug, Error)]
pub enum FieldkitError {
    /// Declaration or registry failure
    #[error(transparent)]
    Fields(#[from] FieldsError),

    /// Backend read or write failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// YAML document could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The schema validator refused a JSON document
    #[error("document rejected by schema: {}", .messages.join("; "))]
    SchemaRejected { messages: Vec<String> },

    /// No resource with this id in the document
    #[error("resource not found: {id}")]
    ResourceNotFound { id: String },

    /// The host refused to register a resource
    #[error("failed to register {kind} '{id}': {message}")]
    Registration {
        kind: ResourceKind,
        id: String,
        message: String,
    },
}

impl FieldkitError {
    pub fn resource_not_found(id: impl Into<String>) -> Self {
        Self::ResourceNotFound { id: id.into() }
    }

    pub fn registration(kind: ResourceKind, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registration {
            kind,
            id: id.into(),
            message: message.into(),
        }
    }
}
