//! Configuration schema types.
//!
//! This module defines the structure of each configuration section.

use daedalus_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Controller behavior applied to the root of a server.
///
/// # Example
///
/// ```
/// use daedalus_config::ServerConfig;
///
/// let config = ServerConfig {
///     debug_mode: true,
///     ..ServerConfig::default()
/// };
/// assert!(config.describe_routes);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Attach file, line and trace to error envelopes.
    #[serde(default)]
    pub debug_mode: bool,

    /// Answer `OPTIONS` with a route description.
    #[serde(default = "default_true")]
    pub describe_routes: bool,

    /// Send the envelope status as the transport status.
    #[serde(default = "default_true")]
    pub http_status_codes: bool,

    /// Format used when negotiation finds nothing ("json", "xml", "text", "custom").
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            describe_routes: true,
            http_status_codes: true,
            default_format: default_format(),
        }
    }
}

fn default_format() -> String {
    "json".to_string()
}

/// OpenAPI document settings. Presence enables the `spec` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiSpecConfig {
    /// API title.
    pub title: String,

    /// API version.
    pub version: String,

    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Server URL listed in `servers`.
    #[serde(default)]
    pub server: Option<String>,

    /// Include sub-controllers.
    #[serde(default = "default_true")]
    pub recurse: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts this section into the telemetry crate's [`LogConfig`].
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ansi: self.ansi_enabled,
            file_line_info: self.include_location,
            include_target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert!(!config.debug_mode);
        assert!(config.describe_routes);
        assert!(config.http_status_codes);
        assert_eq!(config.default_format, "json");
    }

    #[test]
    fn test_server_partial_toml() {
        let config: ServerConfig = toml::from_str("debug_mode = true").unwrap();
        assert!(config.debug_mode);
        assert!(config.http_status_codes);
    }

    #[test]
    fn test_server_rejects_unknown_field() {
        let result: Result<ServerConfig, _> = toml::from_str("http_addr = \"0.0.0.0:80\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_api_spec_requires_title() {
        let result: Result<ApiSpecConfig, _> = toml::from_str("version = \"1.0\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_api_spec_recurse_default() {
        let config: ApiSpecConfig = toml::from_str("title = \"Demo\"\nversion = \"1.0\"").unwrap();
        assert!(config.recurse);
        assert!(config.server.is_none());
    }

    #[test]
    fn test_logging_to_log_config() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Compact,
            ansi_enabled: true,
            include_location: true,
            ..LoggingConfig::default()
        };
        let log = config.to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Compact);
        assert!(log.ansi);
        assert!(log.file_line_info);
    }
}
