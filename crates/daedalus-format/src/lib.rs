//! Response formatting for Daedalus.
//!
//! This crate turns an envelope value into response bytes:
//!
//! - [`negotiate`] picks an [`OutputFormat`] from the Accept header and the
//!   URI suffix, stripping the suffix
//! - [`json::pretty_print`] re-indents compact JSON with a single character
//!   scan
//! - [`xml::to_xml`] and [`text::to_text`] render the other built-in formats
//! - [`Formatter`] ties them together, with an optional [`CustomFormat`]
//!
//! # Example
//!
//! ```
//! use daedalus_format::{Formatter, OutputFormat};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let response = Formatter::new()
//!     .render(&json!({"status": 200, "data": "test"}), OutputFormat::Json, StatusCode::OK, false)
//!     .unwrap();
//!
//! assert_eq!(response.body_text(), "{\n    \"status\": 200,\n    \"data\": \"test\"\n}");
//! assert_eq!(response.content_length(), response.body().len());
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-format/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod formatter;
pub mod json;
mod negotiate;
mod response;
pub mod text;
pub mod xml;

pub use error::{FormatError, FormatResult};
pub use formatter::{CustomFormat, Formatter};
pub use negotiate::{
    negotiate, Negotiated, OutputFormat, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE, XML_CONTENT_TYPE,
};
pub use response::FormattedResponse;

/// Renders a scalar the way the text and XML formats print leaf values.
///
/// Strings are verbatim, `true` is `1`, `false` and `null` are empty, and
/// nested arrays or objects fall back to compact JSON.
pub(crate) fn scalar_text(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        nested => nested.to_string(),
    }
}

/// True for keys that read as numbers, which the XML and text formats treat
/// as list indices.
pub(crate) fn is_numeric_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && key.parse::<f64>().is_ok_and(f64::is_finite)
}
