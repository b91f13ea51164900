//! Runtime configuration - TOML file plus environment overrides
//!
//! ```toml
//! [log]
//! level = "debug"
//! json_format = true
//!
//! [buffer]
//! initial_capacity = 10
//! growth = { kind = "fixed", increment = 10 }
//! ```
//!
//! Environment variables take precedence over the file:
//! `SLOTRC_LOG_LEVEL`, `SLOTRC_LOG_FILE`, `SLOTRC_LOG_JSON`, `SLOTRC_LOG_SPANS`,
//! `SLOTRC_BUFFER_INITIAL`, `SLOTRC_BUFFER_GROWTH` (`double` or `fixed:<n>`).

use crate::buffer::BufferConfig;
use crate::error::ConfigError;
use crate::logging::LogConfig;
use serde::Deserialize;
use std::path::Path;

/// Complete runtime settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub log: LogConfig,
    pub buffer: BufferConfig,
}

impl RuntimeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.buffer.validate()?;
        Ok(config)
    }

    /// Read a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&source)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `SLOTRC_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.log.apply_env();

        if let Ok(value) = std::env::var("SLOTRC_BUFFER_INITIAL") {
            self.buffer.initial_capacity = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: "SLOTRC_BUFFER_INITIAL",
                value,
            })?;
        }

        if let Ok(value) = std::env::var("SLOTRC_BUFFER_GROWTH") {
            self.buffer.growth = value.parse()?;
        }

        self.buffer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::GrowthPolicy;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.buffer.growth, GrowthPolicy::Doubling);
    }

    #[test]
    fn test_parse_full_document() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [log]
            level = "trace"
            json_format = true

            [buffer]
            initial_capacity = 4
            growth = { kind = "fixed", increment = 6 }
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, "trace");
        assert!(config.log.json_format);
        assert!(!config.log.show_spans);
        assert_eq!(config.buffer, BufferConfig::fixed(4, 6));
    }

    #[test]
    fn test_parse_doubling() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [buffer]
            growth = { kind = "doubling" }
            "#,
        )
        .unwrap();
        assert_eq!(config.buffer.initial_capacity, 10);
        assert_eq!(config.buffer.growth, GrowthPolicy::Doubling);
    }

    #[test]
    fn test_zero_increment_rejected() {
        let result = RuntimeConfig::from_toml_str(
            r#"
            [buffer]
            growth = { kind = "fixed", increment = 0 }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ZeroIncrement)));
    }

    #[test]
    fn test_malformed_document() {
        let result = RuntimeConfig::from_toml_str("[buffer]\ninitial_capacity = \"ten\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slotrc.toml");
        std::fs::write(&path, "[buffer]\ninitial_capacity = 3\n").unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        if std::env::var_os("SLOTRC_BUFFER_INITIAL").is_none() {
            assert_eq!(config.buffer.initial_capacity, 3);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = RuntimeConfig::load("/nonexistent/slotrc.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
