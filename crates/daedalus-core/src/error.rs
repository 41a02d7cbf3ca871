//! Error types for Daedalus.
//!
//! [`DispatchError`] is the taxonomy a dispatch can end in. Resolution and
//! binding failures are 400-class and are produced before any handler runs;
//! [`HandlerError`] is what handlers, access hooks and panics turn into.
//!
//! | Variant | Kind name | Status |
//! |---|---|---|
//! | `RouteNotFound` | `RouteNotFoundException` | 400 |
//! | `MethodNotFound` | `MethodNotFoundException` | 400 |
//! | `MissingRequiredArgument` | `MissingRequiredArgumentException` | 400 |
//! | `Handler` | handler-supplied | handler code or 500 |

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;

use serde_json::Value;
use thiserror::Error;

use crate::envelope::{DebugInfo, ResponseEnvelope};

/// Result type alias using [`DispatchError`].
pub type DispatchResult<T> = Result<T, DispatchError>;

/// What a handler returns.
pub type HandlerResult = Result<Value, HandlerError>;

/// Errors that end a dispatch with an error envelope.
///
/// # Example
///
/// ```
/// use daedalus_core::DispatchError;
///
/// let err = DispatchError::missing_argument("username");
/// assert_eq!(err.to_string(), "Argument 'username' is missing.");
/// assert_eq!(err.kind(), "MissingRequiredArgumentException");
/// assert_eq!(err.status(), 400);
/// ```
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No pattern matched the URI for the verb.
    #[error("There is no route for '{uri}'.")]
    RouteNotFound {
        /// URI relative to the controller that gave up.
        uri: String,
    },

    /// A bound handler names a method its resource does not have.
    #[error("There is no method '{method}' in {resource}.")]
    MethodNotFound {
        /// The method name.
        method: String,
        /// The resource name.
        resource: String,
    },

    /// A required parameter had no value in any source.
    #[error("Argument '{name}' is missing.")]
    MissingRequiredArgument {
        /// The parameter name.
        name: String,
    },

    /// Raised by a handler, an access hook or a caught panic.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl DispatchError {
    /// Creates a route-not-found error.
    #[must_use]
    pub fn route_not_found(uri: impl Into<String>) -> Self {
        Self::RouteNotFound { uri: uri.into() }
    }

    /// Creates a method-not-found error.
    #[must_use]
    pub fn method_not_found(method: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
            resource: resource.into(),
        }
    }

    /// Creates a missing-argument error.
    #[must_use]
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingRequiredArgument { name: name.into() }
    }

    /// Returns the error kind name written to the `error` field.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::RouteNotFound { .. } => "RouteNotFoundException",
            Self::MethodNotFound { .. } => "MethodNotFoundException",
            Self::MissingRequiredArgument { .. } => "MissingRequiredArgumentException",
            Self::Handler(err) => err.kind(),
        }
    }

    /// Returns the envelope status.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Handler(err) => err.status(),
            _ => 400,
        }
    }

    /// Converts the error into an envelope, attaching debug data if asked.
    #[must_use]
    pub fn to_envelope(&self, debug: bool) -> ResponseEnvelope {
        match self {
            Self::Handler(err) => err.to_envelope(debug),
            other => ResponseEnvelope::failure(
                other.status(),
                other.kind(),
                Value::String(other.to_string()),
            ),
        }
    }
}

/// An error raised while handling a request.
///
/// Carries the error kind name, a message (any JSON value), an optional
/// numeric code used as the envelope status, and where it was raised.
///
/// # Example
///
/// ```
/// use daedalus_core::HandlerError;
///
/// let err = HandlerError::new("NotAllowedException", "Nope").with_code(403);
/// assert_eq!(err.status(), 403);
///
/// let err = HandlerError::exception("boom");
/// assert_eq!(err.kind(), "Exception");
/// assert_eq!(err.status(), 500);
/// ```
#[derive(Debug)]
pub struct HandlerError {
    kind: String,
    message: Value,
    code: Option<u16>,
    location: &'static Location<'static>,
    trace: String,
}

impl HandlerError {
    /// Creates an error with a kind name and message.
    #[must_use]
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            code: None,
            location: Location::caller(),
            trace: capture_trace(),
        }
    }

    /// Creates a generic `Exception`.
    #[must_use]
    #[track_caller]
    pub fn exception(message: impl Into<Value>) -> Self {
        Self::new("Exception", message)
    }

    /// Creates the error a caught panic turns into.
    #[must_use]
    #[track_caller]
    pub fn panic(message: impl Into<String>) -> Self {
        Self::new("Panic", Value::String(message.into()))
    }

    /// Sets the numeric code. Zero means "no code".
    #[must_use]
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = (code != 0).then_some(code);
        self
    }

    /// Returns the error kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the message value.
    #[must_use]
    pub fn message(&self) -> &Value {
        &self.message
    }

    /// Returns the explicit code, if any.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// Returns the envelope status: the code, or 500.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.code.unwrap_or(500)
    }

    /// Returns where the error was raised.
    #[must_use]
    pub fn debug_info(&self) -> DebugInfo {
        DebugInfo {
            file: self.location.file().to_string(),
            line: self.location.line(),
            trace: self.trace.clone(),
        }
    }

    /// Converts the error into an envelope.
    #[must_use]
    pub fn to_envelope(&self, debug: bool) -> ResponseEnvelope {
        let envelope = ResponseEnvelope::failure(self.status(), &self.kind, self.message.clone());
        if debug {
            envelope.with_debug(self.debug_info())
        } else {
            envelope
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Value::String(s) => write!(f, "{}: {}", self.kind, s),
            other => write!(f, "{}: {}", self.kind, other),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<anyhow::Error> for HandlerError {
    #[track_caller]
    fn from(err: anyhow::Error) -> Self {
        let mut handler_err = Self::exception(err.to_string());
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        if !chain.is_empty() {
            handler_err.trace = format!("caused by: {}\n{}", chain.join("\ncaused by: "), handler_err.trace);
        }
        handler_err
    }
}

fn capture_trace() -> String {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found() {
        let err = DispatchError::route_not_found("login");
        assert_eq!(err.to_string(), "There is no route for 'login'.");
        assert_eq!(err.kind(), "RouteNotFoundException");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_method_not_found() {
        let err = DispatchError::method_not_found("getNothing", "MyRoutes");
        assert_eq!(err.to_string(), "There is no method 'getNothing' in MyRoutes.");
        assert_eq!(err.kind(), "MethodNotFoundException");
    }

    #[test]
    fn test_dispatch_envelope() {
        let envelope = DispatchError::missing_argument("password").to_envelope(true);
        let value = envelope.to_value();
        assert_eq!(value["status"], 400);
        assert_eq!(value["error"], "MissingRequiredArgumentException");
        assert_eq!(value["message"], "Argument 'password' is missing.");
        assert!(value.get("file").is_none());
    }

    #[test]
    fn test_handler_error_code() {
        assert_eq!(HandlerError::exception("x").status(), 500);
        assert_eq!(HandlerError::exception("x").with_code(0).status(), 500);
        assert_eq!(HandlerError::exception("x").with_code(418).status(), 418);
    }

    #[test]
    fn test_handler_error_location() {
        let err = HandlerError::exception("x");
        let info = err.debug_info();
        assert!(info.file.ends_with("error.rs"));
        assert!(info.line > 0);
    }

    #[test]
    fn test_handler_error_debug_envelope() {
        let err = HandlerError::new("Failure", "bad").with_code(409);
        let plain = err.to_envelope(false).to_value();
        assert!(plain.get("line").is_none());

        let debug = err.to_envelope(true).to_value();
        assert_eq!(debug["status"], 409);
        assert_eq!(debug["error"], "Failure");
        assert!(debug["line"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_handler_error_from_anyhow() {
        let source = anyhow::anyhow!("disk full").context("saving report");
        let err = HandlerError::from(source);
        assert_eq!(err.kind(), "Exception");
        assert_eq!(err.message(), &Value::String("saving report".to_string()));
        assert!(err.debug_info().trace.contains("disk full"));
    }

    #[test]
    fn test_handler_error_display() {
        assert_eq!(HandlerError::exception("boom").to_string(), "Exception: boom");
        let err: DispatchError = HandlerError::new("Custom", serde_json::json!({"a": 1})).into();
        assert_eq!(err.to_string(), r#"Custom: {"a":1}"#);
    }
}
