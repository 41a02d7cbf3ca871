//! Logging setup for Daedalus.
//!
//! The dispatcher emits `tracing` events; this crate installs the subscriber
//! that writes them out. Field names shared across events live in
//! [`logging::fields`].
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     format: LogFormat::Compact,
//!     ..LogConfig::default()
//! };
//! init_logging(&config).expect("logging");
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{fields, init_logging, LogConfig, LogFormat, LOG_LEVELS};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
