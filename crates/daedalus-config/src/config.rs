//! Top-level configuration type.

use daedalus_format::OutputFormat;
use daedalus_telemetry::{LogFormat, LOG_LEVELS};
use serde::{Deserialize, Serialize};

use crate::{ApiSpecConfig, ConfigError, LoggingConfig, ServerConfig};

/// Complete Daedalus configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use daedalus_config::DaedalusConfig;
///
/// let config = DaedalusConfig::default();
/// assert_eq!(config.server.default_format, "json");
/// assert!(config.api_spec.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DaedalusConfig {
    /// Controller behavior.
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAPI document settings.
    #[serde(default)]
    pub api_spec: Option<ApiSpecConfig>,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DaedalusConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `server.default_format` is not a known format token
    /// - `api_spec.title` or `api_spec.version` is empty
    /// - `logging.level` is not a known level
    pub fn validate(&self) -> Result<(), ConfigError> {
        if OutputFormat::from_token(&self.server.default_format).is_none() {
            return Err(ConfigError::UnknownOutputFormat(
                self.server.default_format.clone(),
            ));
        }

        if let Some(spec) = &self.api_spec {
            if spec.title.trim().is_empty() {
                return Err(ConfigError::EmptyApiSpecField("title"));
            }
            if spec.version.trim().is_empty() {
                return Err(ConfigError::EmptyApiSpecField("version"));
            }
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::UnknownLogLevel(self.logging.level.clone()));
        }

        Ok(())
    }

    /// Local development preset: debug envelopes and pretty debug logs.
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                debug_mode: true,
                ..ServerConfig::default()
            },
            api_spec: None,
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ansi_enabled: true,
                include_location: true,
                ..LoggingConfig::default()
            },
        }
    }

    /// Production preset: no debug fields and JSON logs.
    pub fn production() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DaedalusConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(DaedalusConfig::development().validate().is_ok());
        assert!(DaedalusConfig::production().validate().is_ok());
        assert!(DaedalusConfig::development().server.debug_mode);
        assert!(!DaedalusConfig::production().server.debug_mode);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut config = DaedalusConfig::default();
        config.server.default_format = "yaml".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(&err, ConfigError::UnknownOutputFormat(f) if f == "yaml"));
        assert_eq!(err.field(), Some("server.default_format"));
    }

    #[test]
    fn test_custom_format_accepted() {
        let mut config = DaedalusConfig::default();
        config.server.default_format = "custom".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let config = DaedalusConfig {
            api_spec: Some(ApiSpecConfig {
                title: " ".to_string(),
                version: "1.0".to_string(),
                description: None,
                server: None,
                recurse: true,
            }),
            ..DaedalusConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyApiSpecField("title"))));
    }

    #[test]
    fn test_empty_version_rejected() {
        let config = DaedalusConfig {
            api_spec: Some(ApiSpecConfig {
                title: "Demo".to_string(),
                version: String::new(),
                description: None,
                server: None,
                recurse: true,
            }),
            ..DaedalusConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyApiSpecField("version"))));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let mut config = DaedalusConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::UnknownLogLevel(l)) if l == "verbose"));
        config.logging.level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }
}
