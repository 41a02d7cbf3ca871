//! The response envelope.
//!
//! Every dispatch ends in a [`ResponseEnvelope`]. Serialization always writes
//! `status` first, whatever the formatter.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Where an error was raised, attached in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    /// Source file.
    pub file: String,
    /// Source line.
    pub line: u32,
    /// Captured trace, empty when backtraces are disabled.
    pub trace: String,
}

/// Uniform `{status, data}` or `{status, error, message}` wrapper.
///
/// # Example
///
/// ```
/// use daedalus_core::ResponseEnvelope;
/// use serde_json::json;
///
/// let envelope = ResponseEnvelope::success(json!("test"));
/// assert_eq!(
///     serde_json::to_string(&envelope).unwrap(),
///     r#"{"status":200,"data":"test"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// A handler returned normally.
    Success {
        /// Envelope status.
        status: u16,
        /// Handler result.
        data: Value,
    },
    /// Something failed.
    Failure {
        /// Envelope status.
        status: u16,
        /// Error kind name.
        error: String,
        /// Error message.
        message: Value,
        /// Raise site, in debug mode.
        debug: Option<DebugInfo>,
    },
}

impl ResponseEnvelope {
    /// Wraps a result with status 200.
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self::Success { status: 200, data }
    }

    /// Creates an error envelope.
    #[must_use]
    pub fn failure(status: u16, error: impl Into<String>, message: Value) -> Self {
        Self::Failure {
            status,
            error: error.into(),
            message,
            debug: None,
        }
    }

    /// Attaches debug information to a failure. Successes are unchanged.
    #[must_use]
    pub fn with_debug(self, info: DebugInfo) -> Self {
        match self {
            Self::Failure {
                status,
                error,
                message,
                ..
            } => Self::Failure {
                status,
                error,
                message,
                debug: Some(info),
            },
            success => success,
        }
    }

    /// Returns the envelope status.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    /// Returns true for a success envelope.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts the envelope to an ordered JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { status, data } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", status)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            Self::Failure {
                status,
                error,
                message,
                debug,
            } => {
                let len = if debug.is_some() { 6 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("status", status)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("message", message)?;
                if let Some(info) = debug {
                    map.serialize_entry("file", &info.file)?;
                    map.serialize_entry("line", &info.line)?;
                    map.serialize_entry("trace", &info.trace)?;
                }
                map.end()
            }
        }
    }
}
