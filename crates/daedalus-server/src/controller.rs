//! Controller tree nodes and their inherited settings.

use std::fmt;
use std::sync::Arc;

use daedalus_config::ApiSpecConfig;
use daedalus_core::{Args, FunctionHandler, Handler, HandlerDescriptor, HandlerResult, MethodDecl, Resource};
use daedalus_docs::OpenApiGenerator;
use daedalus_format::{Formatter, OutputFormat};
use daedalus_router::RouteTable;

use crate::hooks::{AccessHook, ExceptionHook};

/// Index of a controller in its server's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(pub(crate) usize);

impl ControllerId {
    /// The root controller.
    pub const ROOT: Self = Self(0);
}

/// Something to register as a handler.
///
/// A method name resolves against the controller's resource.
#[derive(Debug)]
pub enum HandlerRef {
    /// A method of the controller's resource.
    Method(String),
    /// A free function.
    Function(FunctionHandler),
}

impl From<&str> for HandlerRef {
    fn from(name: &str) -> Self {
        Self::Method(name.to_string())
    }
}

impl From<String> for HandlerRef {
    fn from(name: String) -> Self {
        Self::Method(name)
    }
}

impl From<FunctionHandler> for HandlerRef {
    fn from(func: FunctionHandler) -> Self {
        Self::Function(func)
    }
}

/// A registered handler and its descriptor, built once at registration.
#[derive(Debug, Clone)]
pub(crate) struct RouteEntry {
    pub(crate) handler: Handler,
    pub(crate) descriptor: Arc<HandlerDescriptor>,
}

/// Settings for the API specification endpoint.
///
/// # Example
///
/// ```
/// use daedalus_server::ApiSpec;
///
/// let spec = ApiSpec::new("Inventory", "1.0.0")
///     .description("Stock levels")
///     .server("https://api.example.com");
/// assert!(spec.recurse);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSpec {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Server URL listed in `servers`.
    pub server: Option<String>,
    /// Include sub-controllers.
    pub recurse: bool,
}

impl ApiSpec {
    /// Creates settings with a title and version.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            server: None,
            recurse: true,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the server URL.
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.server = Some(url.into());
        self
    }

    /// Sets whether sub-controllers are included.
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub(crate) fn generator(&self) -> OpenApiGenerator {
        let mut generator = OpenApiGenerator::new()
            .title(&self.title)
            .version(&self.version)
            .recurse(self.recurse);
        if let Some(description) = &self.description {
            generator = generator.description(description);
        }
        if let Some(server) = &self.server {
            generator = generator.server(server);
        }
        generator
    }
}

impl From<&ApiSpecConfig> for ApiSpec {
    fn from(config: &ApiSpecConfig) -> Self {
        Self {
            title: config.title.clone(),
            version: config.version.clone(),
            description: config.description.clone(),
            server: config.server.clone(),
            recurse: config.recurse,
        }
    }
}

/// Per-controller behavior, copied into a child when it is created.
#[derive(Clone)]
pub(crate) struct Settings {
    pub(crate) debug_mode: bool,
    pub(crate) describe_routes: bool,
    pub(crate) http_status_codes: bool,
    pub(crate) default_format: OutputFormat,
    pub(crate) formatter: Formatter,
    pub(crate) access_hook: Option<Arc<AccessHook>>,
    pub(crate) exception_hook: Option<Arc<ExceptionHook>>,
    pub(crate) api_spec: Option<ApiSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            describe_routes: true,
            http_status_codes: true,
            default_format: OutputFormat::Json,
            formatter: Formatter::new(),
            access_hook: None,
            exception_hook: None,
            api_spec: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("debug_mode", &self.debug_mode)
            .field("describe_routes", &self.describe_routes)
            .field("http_status_codes", &self.http_status_codes)
            .field("default_format", &self.default_format)
            .field("formatter", &self.formatter)
            .field("access_hook", &self.access_hook.is_some())
            .field("exception_hook", &self.exception_hook.is_some())
            .field("api_spec", &self.api_spec)
            .finish()
    }
}

/// A node of the controller tree.
pub(crate) struct ControllerNode {
    pub(crate) prefix: String,
    pub(crate) parent: Option<ControllerId>,
    pub(crate) children: Vec<ControllerId>,
    pub(crate) resource: Arc<dyn Resource>,
    pub(crate) routes: RouteTable<RouteEntry>,
    pub(crate) settings: Settings,
    pub(crate) fallback: Option<RouteEntry>,
}

impl ControllerNode {
    pub(crate) fn new(prefix: String, parent: Option<ControllerId>, resource: Arc<dyn Resource>, settings: Settings) -> Self {
        Self {
            prefix,
            parent,
            children: Vec::new(),
            resource,
            routes: RouteTable::new(),
            settings,
            fallback: None,
        }
    }
}

impl fmt::Debug for ControllerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerNode")
            .field("prefix", &self.prefix)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("resource", &self.resource.name())
            .field("routes", &self.routes.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// The resource of a controller created without one.
///
/// Only free functions can be registered usefully; a method name answers
/// with `MethodNotFoundException`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Unbound;

impl Resource for Unbound {
    fn name(&self) -> &str {
        "Controller"
    }

    fn methods(&self) -> Vec<MethodDecl> {
        Vec::new()
    }

    fn call(&self, _method: &str, _args: &Args) -> Option<HandlerResult> {
        None
    }
}
