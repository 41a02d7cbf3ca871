//! Request context.
//!
//! A [`RequestContext`] is the already-parsed request a dispatch works on.
//! It replaces any ambient request state: resolution, binding and
//! negotiation read only from it.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request};
use serde_json::{Map, Value};

use crate::VerbKey;

/// Header carrying a verb override for clients limited to GET and POST.
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// The per-dispatch request.
///
/// # Example
///
/// ```
/// use daedalus_core::RequestContext;
/// use http::Method;
///
/// let ctx = RequestContext::new(Method::POST, "/login")
///     .with_query_string("username=a&_method=put");
///
/// assert_eq!(ctx.query().get("username").unwrap(), "a");
/// assert_eq!(ctx.effective_method(), Method::PUT);
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: String,
    query: Map<String, Value>,
    body: Map<String, Value>,
    payload: Bytes,
    accept: Option<String>,
    method_override: Option<String>,
    override_header: Option<String>,
    suppress_status_code: bool,
    format: Option<String>,
}

impl RequestContext {
    /// Creates a context for a verb and URI path.
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            query: Map::new(),
            body: Map::new(),
            payload: Bytes::new(),
            accept: None,
            method_override: None,
            override_header: None,
            suppress_status_code: false,
            format: None,
        }
    }

    /// Builds a context from an `http` request.
    ///
    /// The query string is decoded into [`RequestContext::query`]; a
    /// form-encoded body into [`RequestContext::body`]; any other body is
    /// kept as the raw payload.
    #[must_use]
    pub fn from_http(request: &Request<Bytes>) -> Self {
        let headers = request.headers();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let mut ctx = Self::new(request.method().clone(), request.uri().path())
            .with_query_string(request.uri().query().unwrap_or_default());
        ctx.accept = header(ACCEPT.as_str());
        ctx.override_header = header(METHOD_OVERRIDE_HEADER);

        let is_form = header(CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
        if is_form {
            ctx.body = decode_form(request.body());
        } else {
            ctx.payload = request.body().clone();
        }
        ctx
    }

    /// Decodes and merges a URL query string.
    #[must_use]
    pub fn with_query_string(mut self, query: &str) -> Self {
        self.query.extend(decode_form(query.as_bytes()));
        self
    }

    /// Adds one query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds one decoded body field.
    #[must_use]
    pub fn with_body_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Sets the raw, undecoded body.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Sets the Accept header.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Sets an explicit verb override.
    #[must_use]
    pub fn with_method_override(mut self, method: impl Into<String>) -> Self {
        self.method_override = Some(method.into());
        self
    }

    /// Forces transport status 200.
    #[must_use]
    pub fn with_suppressed_status_code(mut self, suppress: bool) -> Self {
        self.suppress_status_code = suppress;
        self
    }

    /// Sets an explicit output format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Replaces the URI, e.g. after stripping a format suffix.
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// The verb as received.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The verb used for resolution.
    ///
    /// Explicit override, then `_method` in the query, then in the body,
    /// then the `X-HTTP-Method-Override` header, then the received verb.
    /// Anything outside the supported verbs becomes GET.
    #[must_use]
    pub fn effective_method(&self) -> Method {
        let requested = self
            .method_override
            .clone()
            .or_else(|| string_field(&self.query, "_method"))
            .or_else(|| string_field(&self.body, "_method"))
            .or_else(|| self.override_header.clone())
            .unwrap_or_else(|| self.method.as_str().to_string());

        match VerbKey::parse(&requested) {
            Some(VerbKey::Method(method)) => method,
            _ => Method::GET,
        }
    }

    /// The URI path.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Query parameters.
    #[must_use]
    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Decoded body fields.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Raw body.
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Accept header.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    /// True if the transport status must be 200.
    ///
    /// Set explicitly or by a truthy `_suppress_status_code` query value.
    #[must_use]
    pub fn suppress_status_code(&self) -> bool {
        self.suppress_status_code
            || self
                .query
                .get(crate::binder::SUPPRESS_STATUS_CODE)
                .is_some_and(is_truthy)
    }

    /// Explicit output format, or the `_format` query value.
    #[must_use]
    pub fn format(&self) -> Option<String> {
        self.format
            .clone()
            .or_else(|| string_field(&self.query, "_format"))
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}

/// Decodes `a=1&b=2` into string values; undecodable input yields nothing.
pub(crate) fn decode_form(input: &[u8]) -> Map<String, Value> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(input)
        .map(|pairs| {
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        })
        .unwrap_or_default()
}
