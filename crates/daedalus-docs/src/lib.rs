//! # Daedalus Docs
//!
//! OpenAPI 3.0 documents generated from the route descriptions a Daedalus
//! controller tree produces.
//!
//! - Capturing groups in route regexes become `{name}` path parameters;
//!   non-capturing and lookaround groups are dropped
//! - GET, DELETE, HEAD and OPTIONS parameters are documented in the query;
//!   other verbs get a JSON or form request body
//! - Every operation documents the `{status, data}` envelope for 200 and a
//!   shared error schema for 500
//!
//! ```rust,ignore
//! let spec = OpenApiGenerator::new()
//!     .title("My API")
//!     .version("1.0.0")
//!     .spec_path("/spec")
//!     .generate(&server.describe(None))?;
//! println!("{}", spec.to_json()?);
//! ```

mod error;
mod generator;
mod openapi;
mod path;

pub use error::{DocsError, DocsResult};
pub use generator::{schema_for, OpenApiGenerator, ANY_VALUE_SCHEMA, ERROR_SCHEMA};
pub use openapi::{
    Components, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody,
    Response, Schema, SchemaType, Server, OPENAPI_VERSION,
};
