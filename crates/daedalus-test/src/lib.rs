//! # Daedalus Test
//!
//! In-memory testing for Daedalus servers. Requests are built as
//! `http::Request<Bytes>` values and handed straight to
//! [`Server::handle`](daedalus_server::Server::handle); no sockets are
//! involved.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use daedalus_core::{Args, HandlerResult, MethodDecl, Resource, Signature};
//! use daedalus_server::Server;
//! use daedalus_test::TestClient;
//! use serde_json::json;
//!
//! struct Accounts;
//!
//! impl Resource for Accounts {
//!     fn name(&self) -> &str {
//!         "Accounts"
//!     }
//!
//!     fn methods(&self) -> Vec<MethodDecl> {
//!         vec![MethodDecl::new("postLogin").signature(Signature::new().param("username").param("password"))]
//!     }
//!
//!     fn call(&self, method: &str, args: &Args) -> Option<HandlerResult> {
//!         (method == "postLogin").then(|| Ok(json!(args.get_str("username") == Some("peter"))))
//!     }
//! }
//!
//! let mut server = Server::with_resource("/v1", Arc::new(Accounts));
//! server.root().collect_routes(&[]);
//!
//! let client = TestClient::new(server);
//! let response = client
//!     .post("/v1/login")
//!     .query("username", "peter")
//!     .query("password", "pwd")
//!     .send();
//! assert_eq!(response.data().unwrap(), true);
//!
//! let response = client.get("/v1/login").send();
//! response.assert_status_code(400);
//! assert_eq!(response.error_kind().unwrap(), "RouteNotFoundException");
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
