//! Configuration loaded from a TOML file.
//!
//! Every section and field is optional:
//!
//! ```toml
//! [storage]
//! path = ".typed-storage"
//!
//! [codec]
//! mask_falsy = true
//! persist_pattern_flags = true
//!
//! [logging]
//! level = "info"
//! format = "text"
//! timestamps = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Default directory of the durable store.
pub const DEFAULT_STORAGE_PATH: &str = ".typed-storage";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub codec: CodecConfig,
    pub logging: LoggingConfig,
}

/// Where the durable store lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

/// Encoding and read policy of a [`TypedStore`](crate::TypedStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Substitute the caller's default when a decoded value is falsy
    /// (`0`, `NaN`, `false`, `""`, null). Disable for strict reads where a
    /// present record always yields its value.
    pub mask_falsy: bool,

    /// Write pattern flags with the `__exfl__` tag. When disabled, patterns
    /// are written with `__expr__` and their flags are lost.
    pub persist_pattern_flags: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mask_falsy: true,
            persist_pattern_flags: true,
        }
    }
}

impl CodecConfig {
    /// Configuration with falsy masking turned off.
    pub fn strict() -> Self {
        Self {
            mask_falsy: false,
            ..Self::default()
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings used by the CLI.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `typed_storage=debug`.
    pub level: String,
    pub format: LogFormat,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
            timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[storage]
path = "/var/lib/typed-storage"

[codec]
mask_falsy = false
persist_pattern_flags = false

[logging]
level = "typed_storage=debug"
format = "json"
timestamps = false
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/typed-storage"));
        assert!(!config.codec.mask_falsy);
        assert!(!config.codec.persist_pattern_flags);
        assert_eq!(config.logging.level, "typed_storage=debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.timestamps);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_toml("[codec]\nmask_falsy = false\n").unwrap();
        assert_eq!(config.storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));
        assert!(!config.codec.mask_falsy);
        assert!(config.codec.persist_pattern_flags);
        assert_eq!(config.logging.format, LogFormat::Text);

        let empty = Config::from_toml("").unwrap();
        assert_eq!(empty.codec, CodecConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[codec]\nmask_falsy = \"maybe\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/typed-storage.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
