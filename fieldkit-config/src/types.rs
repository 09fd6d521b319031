//! Configuration values

use std::path::PathBuf;

use fieldkit_fields::ContextType;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Which backend family stores field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Values live only for the life of the process
    #[default]
    Memory,
    /// Values are YAML files under `storage.path`
    Yaml,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory of the YAML backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from(".fieldkit/store"),
        }
    }
}

/// Top-level Fieldkit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldkitConfig {
    pub storage: StorageConfig,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Context type assumed when a command does not name one
    pub default_context_type: ContextType,
}

impl Default for FieldkitConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            log_level: "info".to_string(),
            default_context_type: ContextType::Post,
        }
    }
}

impl FieldkitConfig {
    /// Reject values that deserialize but make no sense.
    pub fn validate(&self) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "log_level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        if self.storage.backend == StorageBackend::Yaml
            && self.storage.path.as_os_str().is_empty()
        {
            return Err(ConfigError::invalid_value(
                "storage.path",
                "the yaml backend needs a directory",
            ));
        }
        Ok(())
    }
}
