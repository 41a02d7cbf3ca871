//! # Daedalus Server
//!
//! The controller tree and dispatcher:
//!
//! - [`Server`] owns an arena of controllers, each with a prefix, a route
//!   table and settings copied from its parent when it was mounted
//! - [`ControllerMut`] registers routes, sub-controllers and hooks
//! - [`Server::dispatch`] resolves, binds, invokes and formats one request
//! - [`Server::describe`] produces the `OPTIONS` route description
//!
//! ## Example
//!
//! ```
//! use daedalus_core::{FunctionHandler, RequestContext, Signature};
//! use daedalus_server::Server;
//! use http::Method;
//! use serde_json::json;
//!
//! let login = FunctionHandler::new(|args| {
//!     Ok(json!(args.get_str("username").is_some() && args.get_str("password").is_some()))
//! })
//! .signature(Signature::new().param("username").param("password"));
//!
//! let mut server = Server::new("v1");
//! server.root().add_post_route("login", login);
//!
//! let ctx = RequestContext::new(Method::POST, "/v1/login").with_query_string("username=a");
//! let response = server.dispatch(&ctx);
//! assert_eq!(response.status(), 400);
//! assert!(response.body_text().contains("Argument 'password' is missing."));
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod collect;
mod controller;
mod dispatch;
mod hooks;
mod server;
mod url;

pub use builder::ControllerMut;
pub use controller::{ApiSpec, ControllerId, HandlerRef};
pub use hooks::{AccessHook, AccessRequest, ExceptionHook};
pub use server::Server;
pub use url::normalize_url;
