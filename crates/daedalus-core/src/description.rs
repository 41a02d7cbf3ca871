//! Route description payloads.
//!
//! These are the documents served for `OPTIONS` requests and fed to the
//! API specification generator:
//!
//! ```text
//! {
//!   "parameters": { "_method": {...}, "_suppress_status_code": {...}, "_format": {...} },
//!   "controller": {
//!     "entryPoint": "/v1",
//!     "routes": { "<pattern>": { "uri": "/v1/<pattern>", "methods": { "GET": {...} } } }
//!   },
//!   "subController": { "/v1/admin": { "controller": {...} } }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::descriptor::HandlerDescriptor;

/// Documentation for a reserved request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservedParam {
    /// What the parameter does.
    pub description: String,
    /// Value type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Accepted values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
}

impl ReservedParam {
    fn new(description: &str, ty: &str, values: Option<&str>) -> Self {
        Self {
            description: description.to_string(),
            ty: ty.to_string(),
            values: values.map(str::to_string),
        }
    }
}

/// The reserved parameters every controller understands.
#[must_use]
pub fn reserved_parameters() -> IndexMap<String, ReservedParam> {
    let mut params = IndexMap::new();
    params.insert(
        "_method".to_string(),
        ReservedParam::new(
            "Can be used as HTTP METHOD if the client does not support HTTP methods.",
            "string",
            Some("GET, POST, PUT, DELETE, HEAD, OPTIONS, PATCH"),
        ),
    );
    params.insert(
        "_suppress_status_code".to_string(),
        ReservedParam::new("Suppress the HTTP status code.", "boolean", Some("1, 0")),
    );
    params.insert(
        "_format".to_string(),
        ReservedParam::new(
            "Format of generated data. Can be added as suffix .json .xml",
            "string",
            Some("json, xml, text"),
        ),
    );
    params
}

/// One route: its absolute URI and per-verb descriptors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDescription {
    /// Controller prefix joined with the pattern.
    pub uri: String,
    /// Descriptors by uppercase verb; the wildcard is `_ALL_`.
    pub methods: IndexMap<String, HandlerDescriptor>,
}

/// A controller's own routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerDescription {
    /// The controller's absolute prefix.
    #[serde(rename = "entryPoint")]
    pub entry_point: String,
    /// Routes by pattern.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub routes: IndexMap<String, RouteDescription>,
}

/// A described controller and, optionally, its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    /// Reserved parameter docs; only on the top-level description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, ReservedParam>>,
    /// The controller itself.
    pub controller: ControllerDescription,
    /// Sub-controllers by absolute prefix.
    #[serde(rename = "subController", skip_serializing_if = "IndexMap::is_empty")]
    pub sub_controllers: IndexMap<String, Description>,
}

impl Description {
    /// Iterates this description and every nested one, depth first.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &Description> + '_> {
        Box::new(std::iter::once(self).chain(self.sub_controllers.values().flat_map(Description::walk)))
    }
}

/// Joins a controller prefix and a relative pattern with one slash.
///
/// ```
/// use daedalus_core::description::join_uri;
///
/// assert_eq!(join_uri("/", "test"), "/test");
/// assert_eq!(join_uri("/v1", "login"), "/v1/login");
/// assert_eq!(join_uri("/v1", ""), "/v1/");
/// ```
#[must_use]
pub fn join_uri(prefix: &str, pattern: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), pattern)
}
