//! Formatting error types.

use thiserror::Error;

/// Result type alias using [`FormatError`].
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors that can occur while formatting a response.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The value could not be serialized.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The HTTP response could not be built.
    #[error("failed to build HTTP response: {0}")]
    Http(#[from] http::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FormatError::from(source);
        assert!(err.to_string().starts_with("failed to serialize response"));
    }
}
