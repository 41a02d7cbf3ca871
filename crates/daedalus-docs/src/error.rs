//! Error types for the documentation crate.

use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the OpenAPI document.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The generator is missing required information.
    #[error("OpenAPI generator missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
