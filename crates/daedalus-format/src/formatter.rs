//! Rendering a value in the negotiated format.

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;

use crate::{json, text, xml, FormatResult, FormattedResponse, OutputFormat};

type CustomFn = dyn Fn(&Value) -> String + Send + Sync;

/// A user-supplied output format, selected by the `custom` token.
#[derive(Clone)]
pub struct CustomFormat {
    content_type: String,
    func: Arc<CustomFn>,
}

impl CustomFormat {
    /// Creates a custom format with the given Content-Type.
    pub fn new<F>(content_type: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Self {
            content_type: content_type.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the Content-Type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Renders a value.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        (self.func)(value)
    }
}

impl fmt::Debug for CustomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFormat")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Renders envelopes into [`FormattedResponse`]s.
///
/// JSON output escapes `/` as `\/` unless disabled here or per call.
#[derive(Debug, Clone)]
pub struct Formatter {
    custom: Option<CustomFormat>,
    escape_slashes: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// Creates a formatter with the built-in formats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            custom: None,
            escape_slashes: true,
        }
    }

    /// Installs the custom format.
    #[must_use]
    pub fn with_custom(mut self, custom: CustomFormat) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Sets whether JSON output escapes `/`.
    #[must_use]
    pub fn with_escape_slashes(mut self, escape: bool) -> Self {
        self.escape_slashes = escape;
        self
    }

    /// Returns the custom format, if any.
    #[must_use]
    pub fn custom(&self) -> Option<&CustomFormat> {
        self.custom.as_ref()
    }

    /// Renders `value` in `format` with the given transport status.
    ///
    /// `unescape` disables slash escaping for this call. The custom format
    /// falls back to JSON when none is installed.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(
        &self,
        value: &Value,
        format: OutputFormat,
        status: StatusCode,
        unescape: bool,
    ) -> FormatResult<FormattedResponse> {
        let response = match (format, &self.custom) {
            (OutputFormat::Xml, _) => {
                FormattedResponse::new(status, format.content_type(), xml::to_xml(value))
            }
            (OutputFormat::Text, _) => {
                FormattedResponse::new(status, format.content_type(), text::to_text(value))
            }
            (OutputFormat::Custom, Some(custom)) => {
                FormattedResponse::new(status, custom.content_type(), custom.render(value))
            }
            (OutputFormat::Json | OutputFormat::Custom, _) => {
                let body = json::to_pretty(value, self.escape_slashes && !unescape)?;
                FormattedResponse::new(status, OutputFormat::Json.content_type(), body)
            }
        };
        tracing::trace!(
            format = %format,
            status = status.as_u16(),
            length = response.content_length(),
            "rendered response"
        );
        Ok(response)
    }

    /// Renders `value` as compact JSON, without pretty-printing.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_raw_json(&self, value: &Value, status: StatusCode) -> FormatResult<FormattedResponse> {
        let body = json::to_compact(value, self.escape_slashes)?;
        Ok(FormattedResponse::new(status, OutputFormat::Json.content_type(), body))
    }
}
