//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! presets, files, strings and environment variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use daedalus_telemetry::LogFormat;

use crate::{ApiSpecConfig, ConfigError, DaedalusConfig};

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Defaults or a preset
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// # Example
///
/// ```no_run
/// use daedalus_config::ConfigLoader;
///
/// # fn main() -> Result<(), daedalus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("daedalus.toml")?
///     .with_env_prefix("DAEDALUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: DaedalusConfig,
    env_prefix: Option<String>,
    file_loaded: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DaedalusConfig::default(),
            env_prefix: None,
            file_loaded: false,
        }
    }

    /// Start with default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = DaedalusConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert!(config.server.debug_mode);
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = DaedalusConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = DaedalusConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is picked from the extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or unreadable, is not
    /// valid TOML/JSON, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let file_config = Self::parse_file(&content, path)?;
        self.merge_config(file_config);
        self.file_loaded = true;
        tracing::debug!(path = %path.display(), "loaded configuration file");

        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format ("toml" or "json").
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unsupported.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [server]
    ///     default_format = "xml"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.default_format, "xml");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let parsed = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };

        self.merge_config(parsed);
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix "DAEDALUS", `DAEDALUS__SERVER__DEBUG_MODE=true` sets
    /// `server.debug_mode`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if present.
    ///
    /// # Errors
    ///
    /// Never fails today; a missing `.env` is ignored.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        Ok(self)
    }

    /// Whether a configuration file has been loaded.
    pub fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value cannot be parsed or the
    /// final configuration is invalid.
    pub fn load(mut self) -> Result<DaedalusConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> DaedalusConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<DaedalusConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(
                path.extension()
                    .map_or_else(|| path.display().to_string(), |e| e.to_string_lossy().into_owned()),
            )),
        }
    }

    // Sections missing from the file take their defaults through serde, so a
    // full replace keeps unset fields at their defaults.
    fn merge_config(&mut self, parsed: DaedalusConfig) {
        self.config = parsed;
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: BTreeMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn api_spec_mut(&mut self) -> &mut ApiSpecConfig {
        self.config.api_spec.get_or_insert_with(|| ApiSpecConfig {
            title: String::new(),
            version: String::new(),
            description: None,
            server: None,
            recurse: true,
        })
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();
        let flag = || parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"));
        let optional = || (!value.is_empty()).then(|| value.to_string());

        match parts.as_slice() {
            // Server section
            ["SERVER", "DEBUG_MODE"] => self.config.server.debug_mode = flag()?,
            ["SERVER", "DESCRIBE_ROUTES"] => self.config.server.describe_routes = flag()?,
            ["SERVER", "HTTP_STATUS_CODES"] => self.config.server.http_status_codes = flag()?,
            ["SERVER", "DEFAULT_FORMAT"] => {
                self.config.server.default_format = value.to_lowercase();
            }

            // API spec section
            ["API_SPEC", "TITLE"] => self.api_spec_mut().title = value.to_string(),
            ["API_SPEC", "VERSION"] => self.api_spec_mut().version = value.to_string(),
            ["API_SPEC", "DESCRIPTION"] => self.api_spec_mut().description = optional(),
            ["API_SPEC", "SERVER"] => self.api_spec_mut().server = optional(),
            ["API_SPEC", "RECURSE"] => {
                let recurse = flag()?;
                self.api_spec_mut().recurse = recurse;
            }

            // Logging section
            ["LOGGING", "ENABLED"] => self.config.logging.enabled = flag()?,
            ["LOGGING", "LEVEL"] => self.config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    "compact" => LogFormat::Compact,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json', 'pretty' or 'compact'",
                        ))
                    }
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => self.config.logging.ansi_enabled = flag()?,
            ["LOGGING", "INCLUDE_LOCATION"] => self.config.logging.include_location = flag()?,

            _ => tracing::debug!(key, "ignoring unknown configuration variable"),
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
