//! In-memory client over a [`Server`].

use bytes::Bytes;
use daedalus_server::Server;
use http::Method;
use serde::Serialize;

use crate::error::TestError;
use crate::request::TestRequestBuilder;
use crate::response::TestResponse;

/// Sends requests straight into a server's dispatcher.
///
/// Requests go through the same path as [`Server::handle`]: the query
/// string, form bodies, Accept and override headers are all decoded.
///
/// # Example
///
/// ```
/// use daedalus_core::FunctionHandler;
/// use daedalus_server::Server;
/// use daedalus_test::TestClient;
/// use serde_json::json;
///
/// let mut server = Server::new("/");
/// server.root().add_get_route("test/test", FunctionHandler::new(|_| Ok(json!("test"))));
///
/// let client = TestClient::new(server);
/// let response = client.get("/test/test").send();
/// assert_eq!(response.status_code(), 200);
/// assert_eq!(response.data().unwrap(), "test");
/// ```
#[must_use]
pub struct TestClient {
    server: Server,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps a fully built server.
    pub fn new(server: Server) -> Self {
        Self {
            server,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The wrapped server.
    #[must_use]
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Creates a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Creates a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Creates a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Creates a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Creates a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Creates an OPTIONS request.
    pub fn options(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::OPTIONS, uri)
    }

    /// Creates a HEAD request.
    pub fn head(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::HEAD, uri)
    }

    /// Creates a request with any verb.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let builder = self
            .default_headers
            .iter()
            .fold(TestRequestBuilder::new(method, uri), |b, (name, value)| b.header(name, value));
        TestClientRequest { client: self, builder }
    }
}

/// A request bound to a [`TestClient`].
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the Accept header.
    pub fn accept(mut self, accept: impl AsRef<str>) -> Self {
        self.builder = self.builder.accept(accept);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.builder = self.builder.content_type(content_type);
        self
    }

    /// Sends the verb override header.
    pub fn method_override(mut self, verb: impl AsRef<str>) -> Self {
        self.builder = self.builder.method_override(verb);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sets a form-encoded body.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.form(value);
        self
    }

    /// Dispatches the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built; see [`Self::try_send`].
    pub fn send(self) -> TestResponse {
        match self.try_send() {
            Ok(response) => response,
            Err(err) => panic!("failed to build test request: {err}"),
        }
    }

    /// Dispatches the request, reporting build errors.
    pub fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        Ok(TestResponse::from_http(self.client.server.handle(&request)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daedalus_core::{FunctionHandler, Signature};
    use http::StatusCode;
    use serde_json::{json, Value};

    fn echo() -> FunctionHandler {
        FunctionHandler::new(|args| Ok(json!({"verb": args.verb().as_str(), "name": args.get("name")})))
            .signature(Signature::new().optional_param("name", Value::Null))
    }

    fn client() -> TestClient {
        let mut server = Server::new("/");
        server.root().add_route("echo", echo(), None);
        TestClient::new(server)
    }

    #[test]
    fn test_all_methods() {
        let client = client();
        let verbs = [
            client.get("/echo"),
            client.post("/echo"),
            client.put("/echo"),
            client.patch("/echo"),
            client.delete("/echo"),
            client.head("/echo"),
        ];
        let expected = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD"];
        for (request, verb) in verbs.into_iter().zip(expected) {
            assert_eq!(request.send().data().unwrap()["verb"], verb);
        }
    }

    #[test]
    fn test_query_and_form() {
        let client = client();
        let response = client.get("/echo").query("name", "peter").send();
        assert_eq!(response.data().unwrap()["name"], "peter");

        let response = client.post("/echo").form(&[("name", "paul")]).send();
        assert_eq!(response.data().unwrap()["name"], "paul");

        let response = client.put("/echo").json(&json!({"name": "mary"})).send();
        assert_eq!(response.data().unwrap()["name"], "mary");
    }

    #[test]
    fn test_accept_and_default_header() {
        let client = client().with_default_header("Accept", "application/xml");
        let response = client.get("/echo").send();
        response
            .assert_status(StatusCode::OK)
            .assert_content_type("application/xml");

        let response = client.get("/echo").accept("text/plain").send();
        response.assert_content_type("text/plain");
    }

    #[test]
    fn test_method_override() {
        let client = client();
        let response = client.post("/echo").method_override("PATCH").send();
        assert_eq!(response.data().unwrap()["verb"], "PATCH");
    }

    #[test]
    fn test_content_length() {
        let response = client().get("/missing").send();
        response.assert_status_code(400);
        assert_eq!(response.content_length(), Some(response.body().len() as u64));
        assert_eq!(response.error_kind().unwrap(), "RouteNotFoundException");
    }

    #[test]
    fn test_try_send_reports_build_error() {
        let err = client().get("/echo").header("bad header", "x").try_send().unwrap_err();
        assert!(matches!(err, TestError::InvalidHeader(_)));
    }
}
