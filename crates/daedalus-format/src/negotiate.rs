//! Content negotiation.
//!
//! The Accept header is consulted first, unless it contains `*/*`: the first
//! format token (in [`OutputFormat::ALL`] order) that appears anywhere in it
//! wins. A URI suffix such as `.xml` naming a known format then overrides
//! that choice and is stripped from the URI. Nothing matching leaves the
//! default.

use std::fmt;

/// JSON Content-Type.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// XML Content-Type.
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Text Content-Type.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default).
    #[default]
    Json,
    /// XML with a `<response>` root.
    Xml,
    /// `key: value` lines.
    Text,
    /// A user-supplied formatter.
    Custom,
}

impl OutputFormat {
    /// Every format, in negotiation order.
    pub const ALL: [Self; 4] = [Self::Json, Self::Xml, Self::Text, Self::Custom];

    /// The token used in Accept headers, suffixes and `_format`.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Text => "text",
            Self::Custom => "custom",
        }
    }

    /// Parses a token. Tokens are lowercase.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }

    /// The Content-Type of the built-in formats.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Json | Self::Custom => JSON_CONTENT_TYPE,
            Self::Xml => XML_CONTENT_TYPE,
            Self::Text => TEXT_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A negotiated format and the URI with any format suffix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated {
    /// The chosen format.
    pub format: OutputFormat,
    /// The URI to resolve.
    pub uri: String,
}

/// Negotiates the output format for a request.
///
/// # Example
///
/// ```
/// use daedalus_format::{negotiate, OutputFormat};
///
/// let n = negotiate(Some("application/xml"), "/v1/users", OutputFormat::Json);
/// assert_eq!(n.format, OutputFormat::Xml);
///
/// let n = negotiate(Some("*/*"), "/v1/users.text", OutputFormat::Json);
/// assert_eq!(n.format, OutputFormat::Text);
/// assert_eq!(n.uri, "/v1/users");
/// ```
#[must_use]
pub fn negotiate(accept: Option<&str>, uri: &str, default: OutputFormat) -> Negotiated {
    let mut format = default;

    if let Some(accept) = accept.filter(|a| !a.contains("*/*")) {
        if let Some(found) = OutputFormat::ALL.into_iter().find(|f| accept.contains(f.token())) {
            format = found;
        }
    }

    let mut uri = uri.to_string();
    if let Some((stem, suffix)) = uri.rsplit_once('.') {
        let is_word = !suffix.is_empty() && suffix.chars().all(|c| c.is_alphanumeric() || c == '_');
        if let Some(found) = OutputFormat::from_token(suffix).filter(|_| is_word) {
            format = found;
            uri = stem.to_string();
        }
    }

    tracing::trace!(%format, uri, "negotiated output format");
    Negotiated { format, uri }
}
