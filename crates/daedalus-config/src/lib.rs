//! Typed configuration for Daedalus.
//!
//! - TOML and JSON files or strings
//! - Environment overrides (`PREFIX__SECTION__KEY`)
//! - Strict parsing (unknown fields are errors)
//! - Layering: preset → file → environment
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! debug_mode = false
//! describe_routes = true
//! http_status_codes = true
//! default_format = "json"
//!
//! [api_spec]
//! title = "Inventory API"
//! version = "1.0.0"
//! server = "https://api.example.com"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `DAEDALUS__SERVER__DEBUG_MODE=true`
//! - `DAEDALUS__API_SPEC__TITLE=Inventory`
//! - `DAEDALUS__LOGGING__LEVEL=debug`

#![doc(html_root_url = "https://docs.rs/daedalus-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::DaedalusConfig;
pub use daedalus_telemetry::LogFormat;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{ApiSpecConfig, LoggingConfig, ServerConfig};
