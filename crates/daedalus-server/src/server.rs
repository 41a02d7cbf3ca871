//! The controller tree and its entry points.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use daedalus_config::DaedalusConfig;
use daedalus_core::description::{
    join_uri, reserved_parameters, ControllerDescription, Description, RouteDescription,
};
use daedalus_core::{RequestContext, Resource};
use daedalus_format::OutputFormat;
use http::{Request, Response, StatusCode};
use indexmap::IndexMap;

use crate::builder::ControllerMut;
use crate::controller::{ApiSpec, ControllerId, ControllerNode, Settings, Unbound};
use crate::url::normalize_url;

/// A tree of controllers that dispatches requests.
///
/// The tree is built through [`Server::root`] and is read-only while
/// dispatching, so a built server can be shared across threads.
///
/// # Example
///
/// ```
/// use daedalus_core::{FunctionHandler, RequestContext};
/// use daedalus_server::Server;
/// use http::Method;
/// use serde_json::json;
///
/// let mut server = Server::new("/");
/// server
///     .root()
///     .add_get_route("test/test", FunctionHandler::new(|_| Ok(json!("test"))));
///
/// let response = server.dispatch(&RequestContext::new(Method::GET, "/test/test"));
/// assert_eq!(response.body_text(), "{\n    \"status\": 200,\n    \"data\": \"test\"\n}");
/// ```
pub struct Server {
    pub(crate) nodes: Vec<ControllerNode>,
}

impl Server {
    /// Creates a server whose root has no resource.
    pub fn new(prefix: &str) -> Self {
        Self::with_resource(prefix, Arc::new(Unbound))
    }

    /// Creates a server whose root methods resolve against `resource`.
    pub fn with_resource(prefix: &str, resource: Arc<dyn Resource>) -> Self {
        let root = ControllerNode::new(normalize_url(prefix), None, resource, Settings::default());
        Self { nodes: vec![root] }
    }

    /// Applies the `server` and `api_spec` sections to the root.
    ///
    /// Children copy the root's settings when they are mounted, so apply
    /// configuration before adding sub-controllers.
    pub fn with_config(mut self, config: &DaedalusConfig) -> Self {
        let format = OutputFormat::from_token(&config.server.default_format).unwrap_or_else(|| {
            tracing::warn!(
                format = %config.server.default_format,
                "unknown default format, using json"
            );
            OutputFormat::Json
        });
        self.root()
            .debug_mode(config.server.debug_mode)
            .describe_routes(config.server.describe_routes)
            .http_status_codes(config.server.http_status_codes)
            .default_format(format);
        self.nodes[ControllerId::ROOT.0].settings.api_spec =
            config.api_spec.as_ref().map(ApiSpec::from);
        self
    }

    /// A handle on the root controller.
    pub fn root(&mut self) -> ControllerMut<'_> {
        ControllerMut::new(self, ControllerId::ROOT)
    }

    /// A handle on any controller of this tree.
    pub fn controller(&mut self, id: ControllerId) -> Option<ControllerMut<'_>> {
        if id.0 < self.nodes.len() {
            Some(ControllerMut::new(self, id))
        } else {
            None
        }
    }

    /// The root prefix.
    pub fn prefix(&self) -> &str {
        &self.nodes[ControllerId::ROOT.0].prefix
    }

    /// Number of controllers in the tree, root included.
    #[must_use]
    pub fn controller_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: ControllerId) -> &ControllerNode {
        &self.nodes[id.0]
    }

    /// Dispatches an `http` request.
    ///
    /// Bodies are decoded by [`RequestContext::from_http`].
    pub fn handle(&self, request: &Request<Bytes>) -> Response<Bytes> {
        let formatted = self.dispatch(&RequestContext::from_http(request));
        match formatted.into_http() {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "failed to build HTTP response");
                let mut response = Response::new(Bytes::new());
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }

    /// Describes the whole tree, or the root routes matching `uri`.
    ///
    /// `uri` is relative to the root prefix. Sub-controllers are only
    /// included without a filter.
    pub fn describe(&self, uri: Option<&str>) -> Description {
        self.describe_node(ControllerId::ROOT, uri.filter(|u| !u.is_empty()), true)
    }

    pub(crate) fn describe_node(&self, id: ControllerId, filter: Option<&str>, top: bool) -> Description {
        let node = self.node(id);
        let routes = node
            .routes
            .iter()
            .filter(|route| filter.map_or(true, |uri| route.is_match(uri)))
            .map(|route| {
                let methods = route
                    .methods()
                    .iter()
                    .map(|(verb, entry)| (verb.as_str().to_string(), (*entry.descriptor).clone()))
                    .collect();
                let description = RouteDescription {
                    uri: join_uri(&node.prefix, route.pattern()),
                    methods,
                };
                (route.pattern().to_string(), description)
            })
            .collect();

        let sub_controllers = if filter.is_none() {
            node.children
                .iter()
                .map(|&child| (self.node(child).prefix.clone(), self.describe_node(child, None, false)))
                .collect()
        } else {
            IndexMap::new()
        };

        Description {
            parameters: top.then(reserved_parameters),
            controller: ControllerDescription {
                entry_point: node.prefix.clone(),
                routes,
            },
            sub_controllers,
        }
    }

    /// `id` and its descendants, depth first.
    pub(crate) fn subtree(&self, id: ControllerId) -> Vec<ControllerId> {
        let mut out = vec![id];
        for &child in &self.node(id).children {
            out.extend(self.subtree(child));
        }
        out
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server").field("nodes", &self.nodes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daedalus_core::{FunctionHandler, Signature};
    use http::Method;
    use serde_json::json;

    fn echo() -> FunctionHandler {
        FunctionHandler::new(|args| Ok(json!(args.get_str("id"))))
            .signature(Signature::new().param("id"))
            .doc("Echoes the id.")
    }

    #[test]
    fn test_prefix_normalized() {
        assert_eq!(Server::new("v1").prefix(), "/v1");
        assert_eq!(Server::new("/v1/").prefix(), "/v1");
        assert_eq!(Server::new("/").prefix(), "/");
    }

    #[test]
    fn test_tree_shape() {
        let mut server = Server::new("/");
        let child = server.root().add_sub_controller("sub").add_sub_controller("deep").done().id();
        assert_eq!(server.controller_count(), 3);
        assert_eq!(server.node(child).prefix, "/sub");
        assert_eq!(server.node(ControllerId(2)).prefix, "/sub/deep");
        assert_eq!(server.node(ControllerId(2)).parent, Some(child));
        assert_eq!(server.subtree(ControllerId::ROOT).len(), 3);
    }

    #[test]
    fn test_done_at_root_stays() {
        let mut server = Server::new("/");
        assert_eq!(server.root().done().id(), ControllerId::ROOT);
    }

    #[test]
    fn test_controller_lookup() {
        let mut server = Server::new("/");
        assert!(server.controller(ControllerId::ROOT).is_some());
        assert!(server.controller(ControllerId(4)).is_none());
    }

    #[test]
    fn test_children_inherit_settings() {
        let mut server = Server::new("/");
        let child = server
            .root()
            .debug_mode(true)
            .http_status_codes(false)
            .add_sub_controller("sub")
            .id();
        server.root().debug_mode(false);

        let settings = &server.node(child).settings;
        assert!(settings.debug_mode);
        assert!(!settings.http_status_codes);
    }

    #[test]
    fn test_with_config() {
        let mut config = DaedalusConfig::default();
        config.server.debug_mode = true;
        config.server.default_format = "xml".to_string();
        config.api_spec = Some(daedalus_config::ApiSpecConfig {
            title: "Demo".to_string(),
            version: "1.0".to_string(),
            description: None,
            server: None,
            recurse: true,
        });

        let server = Server::new("/").with_config(&config);
        let settings = &server.node(ControllerId::ROOT).settings;
        assert!(settings.debug_mode);
        assert_eq!(settings.default_format, OutputFormat::Xml);
        assert_eq!(settings.api_spec.as_ref().unwrap().title, "Demo");
    }

    #[test]
    fn test_describe_tree() {
        let mut server = Server::new("/v1");
        server
            .root()
            .add_get_route(r"users/(\d+)", echo())
            .add_sub_controller("admin")
            .add_route("stats", echo(), None)
            .done();

        let description = server.describe(None);
        assert!(description.parameters.is_some());
        assert_eq!(description.controller.entry_point, "/v1");

        let route = &description.controller.routes[r"users/(\d+)"];
        assert_eq!(route.uri, r"/v1/users/(\d+)");
        assert!(route.methods.contains_key("GET"));

        let admin = &description.sub_controllers["/v1/admin"];
        assert!(admin.parameters.is_none());
        assert!(admin.controller.routes["stats"].methods.contains_key("_ALL_"));
    }

    #[test]
    fn test_describe_filtered() {
        let mut server = Server::new("/");
        server
            .root()
            .add_get_route(r"users/(\d+)", echo())
            .add_get_route("login", echo())
            .add_sub_controller("admin")
            .done();

        let description = server.describe(Some("users/7"));
        assert_eq!(description.controller.routes.len(), 1);
        assert!(description.sub_controllers.is_empty());

        let description = server.describe(Some(""));
        assert_eq!(description.controller.routes.len(), 2);
        assert_eq!(description.sub_controllers.len(), 1);
    }

    #[test]
    fn test_describe_serializes() {
        let mut server = Server::new("/");
        server.root().add_get_route("ping", echo());
        let value = serde_json::to_value(server.describe(None)).unwrap();
        assert_eq!(value["controller"]["entryPoint"], "/");
        assert_eq!(value["controller"]["routes"]["ping"]["uri"], "/ping");
        assert_eq!(value["parameters"]["_method"]["type"], "string");
    }

    #[test]
    fn test_handle_http() {
        let mut server = Server::new("/");
        server.root().add_get_route(r"users/(\d+)", echo());

        let request = Request::builder()
            .method(Method::GET)
            .uri("/users/42")
            .body(Bytes::new())
            .unwrap();
        let response = server.handle(&request);
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body, json!({"status": 200, "data": "42"}));
    }
}
