//! Fluent setup of a controller tree.

use std::sync::Arc;

use daedalus_core::{DocBlock, Handler, HandlerDescriptor, HandlerError, Resource, ResponseEnvelope};
use daedalus_format::{CustomFormat, OutputFormat};
use daedalus_router::VerbKey;
use http::Method;

use crate::collect::route_for_method;
use crate::controller::{ApiSpec, ControllerId, ControllerNode, HandlerRef, RouteEntry, Unbound};
use crate::hooks::{AccessHook, AccessRequest, ExceptionHook};
use crate::url::child_prefix;
use crate::Server;

/// A mutable handle on one controller of a [`Server`].
///
/// Every method consumes the handle and returns one, so setup chains:
/// `add_sub_controller` moves to the new child and `done` moves back to
/// the parent.
///
/// # Example
///
/// ```
/// use daedalus_core::FunctionHandler;
/// use daedalus_server::Server;
/// use serde_json::json;
///
/// let mut server = Server::new("/v1");
/// server
///     .root()
///     .add_get_route("ping", FunctionHandler::new(|_| Ok(json!("pong"))))
///     .add_sub_controller("admin")
///     .add_get_route("stats", FunctionHandler::new(|_| Ok(json!({"users": 3}))))
///     .done();
///
/// assert_eq!(server.controller_count(), 2);
/// ```
#[derive(Debug)]
pub struct ControllerMut<'a> {
    server: &'a mut Server,
    id: ControllerId,
}

impl<'a> ControllerMut<'a> {
    pub(crate) fn new(server: &'a mut Server, id: ControllerId) -> Self {
        Self { server, id }
    }

    fn node(&mut self) -> &mut ControllerNode {
        &mut self.server.nodes[self.id.0]
    }

    /// This controller's id.
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// This controller's absolute prefix.
    pub fn prefix(&self) -> &str {
        &self.server.nodes[self.id.0].prefix
    }

    /// Registers a handler for `pattern`; no verb registers the wildcard.
    ///
    /// The pattern is relative to the controller prefix and may be a regex
    /// whose groups become positional arguments.
    pub fn add_route(mut self, pattern: &str, handler: impl Into<HandlerRef>, verb: Option<Method>) -> Self {
        let verb = verb.map_or(VerbKey::Any, VerbKey::Method);
        let entry_handler = self.resolve_handler(handler.into());
        let (signature, doc) = entry_handler.declaration().unwrap_or_default();
        let node = self.node();
        let replaced = node.routes.insert_with(pattern, verb.clone(), |route| RouteEntry {
            descriptor: Arc::new(HandlerDescriptor::build(&signature, &doc, route.capture_count(), &verb)),
            handler: entry_handler,
        });
        if replaced.is_some() {
            tracing::debug!(pattern, verb = verb.as_str(), "replaced route handler");
        }
        self
    }

    /// Registers a GET handler.
    pub fn add_get_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::GET))
    }

    /// Registers a POST handler.
    pub fn add_post_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::POST))
    }

    /// Registers a PUT handler.
    pub fn add_put_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::PUT))
    }

    /// Registers a PATCH handler.
    pub fn add_patch_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::PATCH))
    }

    /// Registers a DELETE handler.
    pub fn add_delete_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::DELETE))
    }

    /// Registers a HEAD handler.
    pub fn add_head_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::HEAD))
    }

    /// Registers an OPTIONS handler, which takes precedence over the route
    /// description for its pattern.
    pub fn add_options_route(self, pattern: &str, handler: impl Into<HandlerRef>) -> Self {
        self.add_route(pattern, handler, Some(Method::OPTIONS))
    }

    /// Registers routes for the resource's methods by name.
    ///
    /// `getStats` becomes `GET stats`, `allTest` answers every verb at
    /// `test`. `@url` tags replace the derived path. Names in `exclude` and
    /// names without a verb prefix are skipped.
    pub fn collect_routes(mut self, exclude: &[&str]) -> Self {
        let methods = self.node().resource.methods();
        for method in methods {
            if exclude.contains(&method.name.as_str()) {
                continue;
            }
            let Some((verb, path)) = route_for_method(&method.name) else {
                tracing::debug!(method = %method.name, "no verb prefix, not collected");
                continue;
            };
            let doc = method.doc.as_deref().map(DocBlock::parse).unwrap_or_default();
            let verb = verb.method().cloned();
            if doc.urls.is_empty() {
                self = self.add_route(&path, method.name.as_str(), verb);
            } else {
                for url in &doc.urls {
                    self = self.add_route(url, method.name.as_str(), verb.clone());
                }
            }
        }
        self
    }

    /// Mounts a child controller without a resource and moves to it.
    ///
    /// The child copies this controller's settings as they are now.
    pub fn add_sub_controller(self, url: &str) -> Self {
        self.mount(url, Arc::new(Unbound))
    }

    /// Mounts a child controller for `resource` and moves to it.
    pub fn add_sub_resource(self, url: &str, resource: Arc<dyn Resource>) -> Self {
        self.mount(url, resource)
    }

    fn mount(self, url: &str, resource: Arc<dyn Resource>) -> Self {
        let parent = &self.server.nodes[self.id.0];
        let prefix = child_prefix(&parent.prefix, url);
        let settings = parent.settings.clone();
        let child = ControllerId(self.server.nodes.len());
        tracing::debug!(prefix = %prefix, parent = %parent.prefix, "mounted sub-controller");
        self.server
            .nodes
            .push(ControllerNode::new(prefix, Some(self.id), resource, settings));
        self.server.nodes[self.id.0].children.push(child);
        Self {
            server: self.server,
            id: child,
        }
    }

    /// Moves to the parent controller; the root stays where it is.
    pub fn done(self) -> Self {
        let parent = self.server.nodes[self.id.0].parent.unwrap_or(self.id);
        Self {
            server: self.server,
            id: parent,
        }
    }

    /// Attaches file, line and trace to error envelopes.
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.node().settings.debug_mode = enabled;
        self
    }

    /// Whether `OPTIONS` answers with a route description.
    pub fn describe_routes(mut self, enabled: bool) -> Self {
        self.node().settings.describe_routes = enabled;
        self
    }

    /// Whether the envelope status is sent as the transport status.
    pub fn http_status_codes(mut self, enabled: bool) -> Self {
        self.node().settings.http_status_codes = enabled;
        self
    }

    /// Format used when negotiation finds nothing.
    pub fn default_format(mut self, format: OutputFormat) -> Self {
        self.node().settings.default_format = format;
        self
    }

    /// Whether JSON output escapes `/`.
    pub fn escape_slashes(mut self, escape: bool) -> Self {
        let node = self.node();
        node.settings.formatter = node.settings.formatter.clone().with_escape_slashes(escape);
        self
    }

    /// Installs the format selected by the `custom` token.
    pub fn custom_format(mut self, custom: CustomFormat) -> Self {
        let node = self.node();
        node.settings.formatter = node.settings.formatter.clone().with_custom(custom);
        self
    }

    /// Installs the access hook run before every handler.
    pub fn check_access<F>(mut self, hook: F) -> Self
    where
        F: Fn(&AccessRequest<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let hook: Arc<AccessHook> = Arc::new(hook);
        self.node().settings.access_hook = Some(hook);
        self
    }

    /// Installs the exception hook.
    pub fn exception_handler<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HandlerError) -> Option<ResponseEnvelope> + Send + Sync + 'static,
    {
        let hook: Arc<ExceptionHook> = Arc::new(hook);
        self.node().settings.exception_hook = Some(hook);
        self
    }

    /// Serves the OpenAPI document at `<prefix>/spec`.
    pub fn api_spec(mut self, spec: ApiSpec) -> Self {
        self.node().settings.api_spec = Some(spec);
        self
    }

    /// Handler run when no route answers. Only the root has one.
    pub fn fallback(mut self, handler: impl Into<HandlerRef>) -> Self {
        if self.id != ControllerId::ROOT {
            tracing::warn!(prefix = %self.prefix(), "fallback handlers are only used on the root controller");
            return self;
        }
        let handler = self.resolve_handler(handler.into());
        let (signature, doc) = handler.declaration().unwrap_or_default();
        let descriptor = HandlerDescriptor::build(&signature, &doc, 0, &VerbKey::Any);
        self.node().fallback = Some(RouteEntry {
            handler,
            descriptor: Arc::new(descriptor),
        });
        self
    }

    fn resolve_handler(&mut self, handler: HandlerRef) -> Handler {
        match handler {
            HandlerRef::Method(name) => Handler::method(Arc::clone(&self.node().resource), name),
            HandlerRef::Function(func) => Handler::function(func),
        }
    }
}
