use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validation::{NAME_MAX, TEXT_MAX};

/// Application configuration
///
/// The sweep interval and staleness threshold are deliberately absent:
/// they are fixed by the relay contract (see `service::sweeper`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_name_len: usize,
    pub max_text_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_name_len: NAME_MAX,
            max_text_len: TEXT_MAX,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (PARLEY_LOGGING__LEVEL, etc.)
        builder = builder.add_source(
            Environment::with_prefix("PARLEY")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.file_path.is_none());
        assert_eq!(config.limits.max_name_len, NAME_MAX);
        assert_eq!(config.limits.max_text_len, TEXT_MAX);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.limits.max_text_len, TEXT_MAX);
    }

    #[test]
    fn test_load_ignores_missing_file() {
        let config = Config::load(Some("/nonexistent/parley.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
