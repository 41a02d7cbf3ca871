//! The rendered response.

use std::borrow::Cow;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};

use crate::FormatResult;

/// A rendered response: transport status, Content-Type and body.
///
/// Content-Length always matches the body.
///
/// # Example
///
/// ```rust
/// use daedalus_format::FormattedResponse;
/// use http::StatusCode;
///
/// let response = FormattedResponse::new(StatusCode::OK, "text/plain; charset=utf-8", "ok\n");
/// assert_eq!(response.content_length(), 3);
///
/// let http = response.into_http().unwrap();
/// assert_eq!(http.headers()["content-length"], "3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResponse {
    status: StatusCode,
    content_type: String,
    body: Bytes,
}

impl FormattedResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: StatusCode, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Replaces the transport status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the transport status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the Content-Type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Builds the Content-Type and Content-Length headers.
    ///
    /// A Content-Type that is not a valid header value is left out.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        headers
    }

    /// Converts into an `http::Response`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Http`](crate::FormatError::Http) if the
    /// Content-Type is not a valid header value.
    pub fn into_http(self) -> FormatResult<Response<Bytes>> {
        let response = Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, self.content_type)
            .header(header::CONTENT_LENGTH, self.body.len())
            .body(self.body)?;
        Ok(response)
    }
}
