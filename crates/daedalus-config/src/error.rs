//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating a [`DaedalusConfig`](crate::DaedalusConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file extension or format name other than `toml` and `json`.
    #[error("unsupported configuration format '{0}', expected 'toml' or 'json'")]
    UnsupportedFormat(String),

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// `server.default_format` names no output format.
    #[error("server.default_format: unknown output format '{0}', expected json, xml, text or custom")]
    UnknownOutputFormat(String),

    /// `logging.level` is not a tracing level.
    #[error("logging.level: unknown level '{0}', expected trace, debug, info, warn or error")]
    UnknownLogLevel(String),

    /// A required `api_spec` field is blank.
    #[error("api_spec.{0} must not be empty when api_spec is set")]
    EmptyApiSpecField(&'static str),

    /// An override variable could not be applied.
    #[error("failed to parse environment variable {var}: {reason}")]
    EnvParseError {
        /// The environment variable name.
        var: String,
        /// Explanation of the parsing error.
        reason: String,
    },
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new environment variable parse error.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// The dotted configuration key the error is about, when there is one.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnknownOutputFormat(_) => Some("server.default_format"),
            Self::UnknownLogLevel(_) => Some("logging.level"),
            Self::EmptyApiSpecField("title") => Some("api_spec.title"),
            Self::EmptyApiSpecField("version") => Some("api_spec.version"),
            _ => None,
        }
    }
}
