//! Configuration provider using Figment

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::types::FieldkitConfig;

/// Prefix of environment overrides. Nested keys are separated by `__`,
/// e.g. `FIELDKIT_STORAGE__BACKEND=yaml`.
pub const ENV_PREFIX: &str = "FIELDKIT_";

/// File names looked up in the project directory, lowest precedence first.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "fieldkit.json",
    "fieldkit.yml",
    "fieldkit.yaml",
    "fieldkit.toml",
];

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn provider(self, path: &Path) -> Figment {
        match self {
            Self::Toml => Figment::from(Toml::file(path)),
            Self::Yaml => Figment::from(Yaml::file(path)),
            Self::Json => Figment::from(Json::file(path)),
        }
    }
}

/// Loads [`FieldkitConfig`] from, in increasing precedence:
///
/// 1. Built-in defaults
/// 2. `fieldkit.{json,yml,yaml,toml}` in the project directory, or one
///    explicitly named file instead
/// 3. `FIELDKIT_*` environment variables
///
/// Nothing is cached; every [`load`](Self::load) reads the sources afresh.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    dir: PathBuf,
    file: Option<PathBuf>,
}

impl ConfigProvider {
    /// Discover files in the current directory.
    pub fn new() -> Self {
        Self::in_dir(".")
    }

    /// Discover files in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file: None,
        }
    }

    /// Read exactly `path` instead of discovering files. The file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Merge every source and extract a validated configuration.
    pub fn load(&self) -> ConfigResult<FieldkitConfig> {
        let config: FieldkitConfig = self.build_figment()?.extract()?;
        config.validate()?;
        debug!(
            backend = ?config.storage.backend,
            path = %config.storage.path.display(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Build the figment with all sources in precedence order.
    pub fn build_figment(&self) -> ConfigResult<Figment> {
        Ok(Figment::new()
            .merge(Serialized::defaults(FieldkitConfig::default()))
            .merge(self.file_sources()?)
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn file_sources(&self) -> ConfigResult<Figment> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            let format = ConfigFormat::from_path(path)
                .ok_or_else(|| ConfigError::UnsupportedFormat { path: path.clone() })?;
            trace!(path = %path.display(), ?format, "loading explicit config file");
            return Ok(format.provider(path));
        }

        let mut figment = Figment::new();
        for name in CONFIG_FILE_NAMES {
            let path = self.dir.join(name);
            if !path.is_file() {
                continue;
            }
            if let Some(format) = ConfigFormat::from_path(&path) {
                trace!(path = %path.display(), ?format, "loading config file");
                figment = figment.merge(format.provider(&path));
            }
        }
        Ok(figment)
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration for the current directory.
pub fn load_config() -> ConfigResult<FieldkitConfig> {
    ConfigProvider::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StorageBackend;
    use fieldkit_fields::ContextType;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn empty_directory_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigProvider::in_dir(temp.path()).load().unwrap();
        assert_eq!(config, FieldkitConfig::default());
    }

    #[test]
    #[serial]
    fn toml_overrides_yaml() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("fieldkit.yaml"),
            "log_level: debug\nstorage:\n  backend: yaml\n",
        )
        .unwrap();
        fs::write(temp.path().join("fieldkit.toml"), "log_level = \"warn\"\n").unwrap();

        let config = ConfigProvider::in_dir(temp.path()).load().unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.storage.backend, StorageBackend::Yaml);
        assert_eq!(config.storage.path, PathBuf::from(".fieldkit/store"));
    }

    #[test]
    #[serial]
    fn explicit_file_replaces_discovery() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("fieldkit.toml"), "log_level = \"warn\"\n").unwrap();
        let explicit = temp.path().join("custom.json");
        fs::write(&explicit, r#"{"default_context_type": "settings"}"#).unwrap();

        let config = ConfigProvider::in_dir(temp.path())
            .with_file(&explicit)
            .load()
            .unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.default_context_type, ContextType::Settings);
    }

    #[test]
    #[serial]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = ConfigProvider::in_dir(temp.path())
            .with_file(temp.path().join("nope.toml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    #[serial]
    fn unsupported_extension_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fieldkit.ini");
        fs::write(&path, "x=1").unwrap();
        let err = ConfigProvider::in_dir(temp.path())
            .with_file(&path)
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    #[serial]
    fn environment_overrides_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("fieldkit.toml"), "[storage]\nbackend = \"memory\"\n").unwrap();
        std::env::set_var("FIELDKIT_STORAGE__BACKEND", "yaml");
        std::env::set_var("FIELDKIT_STORAGE__PATH", "/var/lib/fieldkit");
        let result = ConfigProvider::in_dir(temp.path()).load();
        std::env::remove_var("FIELDKIT_STORAGE__BACKEND");
        std::env::remove_var("FIELDKIT_STORAGE__PATH");

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Yaml);
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/fieldkit"));
    }

    #[test]
    #[serial]
    fn invalid_value_fails_validation() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("fieldkit.toml"), "log_level = \"chatty\"\n").unwrap();
        let err = ConfigProvider::in_dir(temp.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    #[serial]
    fn bad_context_type_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("fieldkit.toml"),
            "default_context_type = \"comment\"\n",
        )
        .unwrap();
        let err = ConfigProvider::in_dir(temp.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
