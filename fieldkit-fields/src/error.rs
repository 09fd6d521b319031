//! Error types for the field registry

use thiserror::Error;

use crate::field::Capability;

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while registering or constructing fields
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A mandatory key (`name`, `type`, `id`) is absent from a declaration
    #[error("missing required key '{key}'")]
    MissingKey { key: String },

    /// A declaration is present but malformed
    #[error("invalid configuration for field '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// The type tag does not resolve in the registry
    #[error("unknown field type: {type_name}")]
    UnknownType { type_name: String },

    /// A registered type does not provide the whole field contract
    #[error("field type '{type_name}' is missing capabilities: {}", join_capabilities(.missing))]
    MissingCapability {
        type_name: String,
        missing: Vec<Capability>,
    },

    /// The context type token is not one of post, term or settings
    #[error("unknown context type: {token}")]
    UnknownContextType { token: String },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldsError {
    /// Create a missing key error
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// True for errors caused by a malformed declaration rather than the registry.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. } | Self::InvalidConfig { .. } | Self::Json(_)
        )
    }
}

fn join_capabilities(missing: &[Capability]) -> String {
    missing
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
