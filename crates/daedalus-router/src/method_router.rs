//! Verb-based handler maps.
//!
//! [`MethodRouter`] holds at most one handler per HTTP method for a single
//! route pattern, plus an optional wildcard handler answering any verb
//! without one of its own.

use http::Method;

use crate::VerbKey;

/// Maps HTTP methods to handlers for a single route.
///
/// # Example
///
/// ```rust
/// use daedalus_router::MethodRouter;
/// use http::Method;
///
/// let router = MethodRouter::new()
///     .get("listUsers")
///     .post("createUser")
///     .any("fallback");
///
/// assert_eq!(router.handler(&Method::GET), Some(&"listUsers"));
/// assert_eq!(router.handler(&Method::DELETE), None);
/// assert_eq!(router.any_handler(), Some(&"fallback"));
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<H> {
    get: Option<H>,
    post: Option<H>,
    put: Option<H>,
    delete: Option<H>,
    patch: Option<H>,
    head: Option<H>,
    options: Option<H>,
    trace: Option<H>,
    connect: Option<H>,
    /// Wildcard handler
    any: Option<H>,
}

impl<H> Default for MethodRouter<H> {
    fn default() -> Self {
        Self {
            get: None,
            post: None,
            put: None,
            delete: None,
            patch: None,
            head: None,
            options: None,
            trace: None,
            connect: None,
            any: None,
        }
    }
}

impl<H> MethodRouter<H> {
    /// Creates a new empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a GET handler.
    #[must_use]
    pub fn get(mut self, handler: H) -> Self {
        self.get = Some(handler);
        self
    }

    /// Registers a POST handler.
    #[must_use]
    pub fn post(mut self, handler: H) -> Self {
        self.post = Some(handler);
        self
    }

    /// Registers a PUT handler.
    #[must_use]
    pub fn put(mut self, handler: H) -> Self {
        self.put = Some(handler);
        self
    }

    /// Registers a DELETE handler.
    #[must_use]
    pub fn delete(mut self, handler: H) -> Self {
        self.delete = Some(handler);
        self
    }

    /// Registers a PATCH handler.
    #[must_use]
    pub fn patch(mut self, handler: H) -> Self {
        self.patch = Some(handler);
        self
    }

    /// Registers the wildcard handler.
    #[must_use]
    pub fn any(mut self, handler: H) -> Self {
        self.any = Some(handler);
        self
    }

    fn slot_mut(&mut self, method: &Method) -> Option<&mut Option<H>> {
        match *method {
            Method::GET => Some(&mut self.get),
            Method::POST => Some(&mut self.post),
            Method::PUT => Some(&mut self.put),
            Method::DELETE => Some(&mut self.delete),
            Method::PATCH => Some(&mut self.patch),
            Method::HEAD => Some(&mut self.head),
            Method::OPTIONS => Some(&mut self.options),
            Method::TRACE => Some(&mut self.trace),
            Method::CONNECT => Some(&mut self.connect),
            _ => None,
        }
    }

    /// Sets the handler for a verb key, returning the one it replaced.
    ///
    /// Extension methods have no slot and are dropped.
    pub fn set(&mut self, verb: VerbKey, handler: H) -> Option<H> {
        match verb {
            VerbKey::Any => self.any.replace(handler),
            VerbKey::Method(m) => self.slot_mut(&m).and_then(|slot| slot.replace(handler)),
        }
    }

    /// Returns the handler registered for exactly this method.
    #[must_use]
    pub fn handler(&self, method: &Method) -> Option<&H> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            Method::HEAD => self.head.as_ref(),
            Method::OPTIONS => self.options.as_ref(),
            Method::TRACE => self.trace.as_ref(),
            Method::CONNECT => self.connect.as_ref(),
            _ => None,
        }
    }

    /// Returns the wildcard handler.
    #[must_use]
    pub fn any_handler(&self) -> Option<&H> {
        self.any.as_ref()
    }

    /// Returns the handler stored under a verb key.
    #[must_use]
    pub fn get_key(&self, verb: &VerbKey) -> Option<&H> {
        match verb {
            VerbKey::Any => self.any.as_ref(),
            VerbKey::Method(m) => self.handler(m),
        }
    }

    /// Returns true if any verb, wildcard included, has a handler.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        self.iter().next().is_some()
    }

    /// Iterates registered handlers in a fixed verb order, wildcard last.
    pub fn iter(&self) -> impl Iterator<Item = (VerbKey, &H)> {
        [
            (Method::GET, &self.get),
            (Method::POST, &self.post),
            (Method::PUT, &self.put),
            (Method::DELETE, &self.delete),
            (Method::PATCH, &self.patch),
            (Method::HEAD, &self.head),
            (Method::OPTIONS, &self.options),
            (Method::TRACE, &self.trace),
            (Method::CONNECT, &self.connect),
        ]
        .into_iter()
        .filter_map(|(m, h)| h.as_ref().map(|h| (VerbKey::Method(m), h)))
        .chain(self.any.as_ref().map(|h| (VerbKey::Any, h)))
    }

    /// Returns the concrete methods with a handler.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.iter().filter_map(|(verb, _)| verb.method().cloned()).collect()
    }
}
