//! Test request building.

use bytes::Bytes;
use daedalus_core::METHOD_OVERRIDE_HEADER;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request};
use serde::Serialize;

use crate::error::TestError;

/// Builder for `http::Request<Bytes>` values aimed at a server.
///
/// Building never panics: the first invalid header or body encoding is
/// kept and reported by [`TestRequestBuilder::build`].
///
/// # Example
///
/// ```
/// use daedalus_test::TestRequestBuilder;
/// use http::Method;
///
/// let request = TestRequestBuilder::new(Method::POST, "/login")
///     .query("username", "peter")
///     .query("password", "s3cr3t")
///     .build()
///     .unwrap();
/// assert_eq!(request.uri(), "/login?username=peter&password=s3cr3t");
/// ```
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a builder. `uri` may already carry a query string.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets a header, replacing any earlier value.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let parsed = HeaderName::try_from(name)
            .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))
            .and_then(|n| {
                HeaderValue::try_from(value.as_ref())
                    .map(|v| (n, v))
                    .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))
            });
        match parsed {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(err) => self.fail(err),
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Accept header.
    pub fn accept(self, accept: impl AsRef<str>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Asks the server to treat the request as `verb`.
    pub fn method_override(self, verb: impl AsRef<str>) -> Self {
        self.header(METHOD_OVERRIDE_HEADER, verb)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.content_type("application/json")
            }
            Err(err) => {
                self.fail(err.into());
                self
            }
        }
    }

    /// Sets a form-encoded body and its Content-Type.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => {
                self.body = Bytes::from(encoded);
                self.content_type("application/x-www-form-urlencoded")
            }
            Err(err) => {
                self.fail(err.into());
                self
            }
        }
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request<Bytes>, TestError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut uri = self.uri;
        if !self.query.is_empty() {
            let encoded = serde_urlencoded::to_string(&self.query)?;
            uri.push(if uri.contains('?') { '&' } else { '?' });
            uri.push_str(&encoded);
        }

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri.as_str())
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(format!("{uri}: {e}")))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    fn fail(&mut self, err: TestError) {
        self.error.get_or_insert(err);
    }
}
