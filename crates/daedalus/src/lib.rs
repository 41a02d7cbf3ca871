//! # Daedalus
//!
//! **Hierarchical REST routing and dispatch**
//!
//! Daedalus maps HTTP requests onto handler methods through a tree of
//! controllers:
//!
//! - Regex route patterns, one handler per verb plus a wildcard
//! - Handler metadata read from doc tags (`@param`, `@return`, `@url`, ...)
//! - Argument binding from query, body, payload and path captures
//! - `{status, data}` envelopes rendered as JSON, XML, text or a custom format
//! - `OPTIONS` route descriptions and an OpenAPI 3.0 document at `<prefix>/spec`
//!
//! ## Quick Start
//!
//! ```
//! use daedalus::prelude::*;
//! use serde_json::json;
//!
//! let mut server = Server::new("/v1");
//! server
//!     .root()
//!     .add_get_route("test/test", FunctionHandler::new(|_| Ok(json!("test"))))
//!     .add_sub_controller("admin")
//!     .add_post_route(
//!         "login",
//!         FunctionHandler::new(|args| Ok(json!(args.get_str("username") == Some("peter"))))
//!             .signature(Signature::new().param("username").param("password")),
//!     );
//!
//! let response = server.dispatch(&RequestContext::new(Method::GET, "/v1/test/test"));
//! assert_eq!(response.body_text(), "{\n    \"status\": 200,\n    \"data\": \"test\"\n}");
//!
//! let ctx = RequestContext::new(Method::POST, "/v1/admin/login").with_query_string("username=peter");
//! let response = server.dispatch(&ctx);
//! assert_eq!(response.status(), 400);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → negotiate format → walk tree (children first) → resolve route
//!                                                              ↓
//! Response ← format envelope ← exception hook ← handler ← access hook ← bind
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Handler model, binding and envelopes
pub use daedalus_core as core;

// Route tables
pub use daedalus_router as router;

// Output formats and negotiation
pub use daedalus_format as format;

// OpenAPI generation
pub use daedalus_docs as docs;

// Controller tree and dispatcher
pub use daedalus_server as server;

// Configuration
pub use daedalus_config as config;

// Logging
pub use daedalus_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```
/// use daedalus::prelude::*;
/// ```
pub mod prelude {
    pub use daedalus_core::{
        Args, DispatchError, FunctionHandler, HandlerError, HandlerResult, MethodDecl,
        RequestContext, Resource, ResponseEnvelope, Signature, TypeTag,
    };

    pub use daedalus_format::{CustomFormat, FormattedResponse, OutputFormat};

    pub use daedalus_server::{AccessRequest, ApiSpec, ControllerMut, Server};

    pub use daedalus_config::{ConfigLoader, DaedalusConfig};

    pub use daedalus_telemetry::{init_logging, LogConfig};

    pub use http::Method;
}
