//! Test response wrapper.

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TestError;

/// A dispatched response with helpers for assertions.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Wraps an `http::Response`.
    pub fn from_http(response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Creates a response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self { status, headers, body }
    }

    /// Returns the transport status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the transport status as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// True for 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True for 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// True for 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Returns the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// Returns the Content-Length header.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.header_str(header::CONTENT_LENGTH.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    ///
    /// ```ignore
    /// let user: User = client.get("/users/1").send().json().unwrap();
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserializes the body as a JSON value.
    pub fn json_value(&self) -> Result<Value, TestError> {
        self.json()
    }

    /// Returns the envelope `data` of a JSON success response.
    pub fn data(&self) -> Result<Value, TestError> {
        let mut value = self.json_value()?;
        value
            .get_mut("data")
            .map(Value::take)
            .ok_or_else(|| TestError::BodyRead("no 'data' field in envelope".to_string()))
    }

    /// Returns the `error` kind of a JSON error envelope.
    pub fn error_kind(&self) -> Result<String, TestError> {
        self.json_value()?
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TestError::BodyRead("no 'error' field in envelope".to_string()))
    }

    /// Asserts the transport status.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts the transport status as a u16.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    pub fn assert_status_code(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {}",
            expected,
            self.status.as_u16()
        );
        self
    }

    /// Asserts a 2xx status.
    ///
    /// # Panics
    ///
    /// Panics otherwise.
    pub fn assert_success(&self) -> &Self {
        assert!(self.is_success(), "Expected success status, got {}", self.status);
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(actual, expected, "Header '{}': expected '{}', got '{}'", name, expected, actual);
        self
    }

    /// Asserts that the Content-Type starts with `expected`.
    ///
    /// # Panics
    ///
    /// Panics if Content-Type is missing or differs.
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let actual = self
            .content_type()
            .unwrap_or_else(|| panic!("Content-Type header not found"));
        assert!(
            actual.starts_with(expected),
            "Content-Type: expected '{}', got '{}'",
            expected,
            actual
        );
        self
    }

    /// Asserts that the body contains `expected`.
    ///
    /// # Panics
    ///
    /// Panics if it does not.
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = String::from_utf8_lossy(&self.body);
        assert!(body.contains(expected), "Body should contain '{}', got: {}", expected, body);
        self
    }

    /// Asserts that the body equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if it does not.
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        assert_eq!(String::from_utf8_lossy(&self.body), expected.as_ref(), "Body mismatch");
        self
    }

    /// Asserts that the JSON body equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    pub fn assert_json_eq(&self, expected: &Value) -> &Self {
        let actual = self
            .json_value()
            .unwrap_or_else(|e| panic!("Body should be valid JSON: {e}"));
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts the value at a dotted path, such as `data.controller.entryPoint`.
    ///
    /// # Panics
    ///
    /// Panics if the path is missing or the value differs.
    pub fn assert_json_field(&self, path: impl AsRef<str>, expected: &Value) -> &Self {
        let path = path.as_ref();
        let json = self
            .json_value()
            .unwrap_or_else(|e| panic!("Body should be valid JSON: {e}"));
        let actual = json_path(&json, path)
            .unwrap_or_else(|| panic!("JSON path '{}' not found in: {}", path, json));
        assert_eq!(actual, expected, "JSON field '{}': expected {}, got {}", path, expected, actual);
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Dotted-path lookup; numeric segments index arrays.
fn json_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match segment.parse::<usize>() {
            Ok(index) if current.is_array() => current.get(index)?,
            _ => current.get(segment)?,
        };
    }
    Some(current)
}
