//! Configuration for Fieldkit tools
//!
//! Settings are layered with Figment: built-in defaults, then a
//! `fieldkit.{json,yml,yaml,toml}` file in the project directory, then
//! `FIELDKIT_*` environment variables.

pub mod error;
pub mod provider;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use provider::{load_config, ConfigFormat, ConfigProvider, CONFIG_FILE_NAMES, ENV_PREFIX};
pub use types::{FieldkitConfig, StorageBackend, StorageConfig};
