//! Error types for value storage

use std::path::PathBuf;

use fieldkit_fields::FieldsError;
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by storage backends and the context router
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a backing file failed
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backing file holds something other than a key/value mapping
    #[error("corrupt store file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Values could not be encoded for writing
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_yaml_ng::Error),

    /// An object id that cannot name a file
    #[error("invalid object id '{0}'")]
    InvalidId(String),

    /// Context type token or other field-level failure
    #[error(transparent)]
    Fields(#[from] FieldsError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
