//! Handlers and their arguments.
//!
//! A [`Handler`] is either a method on a [`Resource`] or a free function.
//! Both are resolved once at registration and never re-inspected per request.

use std::fmt;
use std::sync::Arc;

use http::Method;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::descriptor::Signature;
use crate::doc::{preceding_doc_block, DocBlock};
use crate::error::{DispatchError, HandlerError, HandlerResult};

/// Bound arguments, by parameter name, in declaration order.
///
/// # Example
///
/// ```
/// use daedalus_core::Args;
/// use http::Method;
/// use serde_json::json;
///
/// let mut args = Args::new(Method::GET);
/// args.insert("page", json!("2"));
///
/// assert_eq!(args.get_str("page"), Some("2"));
/// assert_eq!(args.parse::<u32>("page").unwrap(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    values: IndexMap<String, Value>,
    verb: Method,
}

impl Args {
    /// Creates an empty argument list for a verb.
    #[must_use]
    pub fn new(verb: Method) -> Self {
        Self {
            values: IndexMap::new(),
            verb,
        }
    }

    /// Appends an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns a string argument by name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns an argument by position.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.values.get_index(index).map(|(_, v)| v)
    }

    /// Deserializes an argument.
    ///
    /// Query and form values arrive as strings, so a string that is not
    /// valid for `T` is retried as a JSON literal (`"2"` parses as `2`).
    pub fn parse<T: DeserializeOwned>(&self, name: &str) -> Result<T, HandlerError> {
        let value = self.get(name).ok_or_else(|| {
            HandlerError::new("InvalidArgumentException", format!("Argument '{name}' is missing."))
                .with_code(400)
        })?;
        serde_json::from_value(value.clone())
            .or_else(|err| match value {
                Value::String(s) => serde_json::from_str(s),
                _ => Err(err),
            })
            .map_err(|err| {
                HandlerError::new(
                    "InvalidArgumentException",
                    format!("Argument '{name}' is invalid: {err}"),
                )
                .with_code(400)
            })
    }

    /// The effective verb of the request.
    #[must_use]
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the arguments as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// The callable inside a [`FunctionHandler`].
pub type HandlerFn = dyn Fn(&Args) -> HandlerResult + Send + Sync;

/// The declaration of one resource method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Method name, e.g. `postLogin`.
    pub name: String,
    /// Declared parameters.
    pub signature: Signature,
    /// Attached doc block.
    pub doc: Option<String>,
}

impl MethodDecl {
    /// Declares a method without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: Signature::new(),
            doc: None,
        }
    }

    /// Sets the signature.
    #[must_use]
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Attaches a doc block.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Attaches the doc block found above line `decl_line` of `source`.
    #[must_use]
    pub fn doc_from_source(mut self, source: &str, decl_line: usize) -> Self {
        self.doc = preceding_doc_block(source, decl_line);
        self
    }
}

/// A set of handler methods addressed by name.
///
/// # Example
///
/// ```
/// use daedalus_core::{Args, HandlerResult, MethodDecl, Resource, Signature};
/// use serde_json::json;
///
/// struct Users;
///
/// impl Resource for Users {
///     fn name(&self) -> &str {
///         "Users"
///     }
///
///     fn methods(&self) -> Vec<MethodDecl> {
///         vec![MethodDecl::new("getUser").signature(Signature::new().param("id"))]
///     }
///
///     fn call(&self, method: &str, args: &Args) -> Option<HandlerResult> {
///         match method {
///             "getUser" => Some(Ok(json!({"id": args.get("id")}))),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Resource: Send + Sync {
    /// Name used in `MethodNotFoundException` messages.
    fn name(&self) -> &str;

    /// Declared methods.
    fn methods(&self) -> Vec<MethodDecl>;

    /// Calls a method; `None` if there is no such method.
    fn call(&self, method: &str, args: &Args) -> Option<HandlerResult>;
}

/// A free function with its declaration.
///
/// # Example
///
/// ```
/// use daedalus_core::{FunctionHandler, Signature};
/// use serde_json::json;
///
/// let handler = FunctionHandler::new(|args| Ok(json!(args.get_str("name"))))
///     .signature(Signature::new().param("name"))
///     .doc("Echoes the name.");
/// ```
pub struct FunctionHandler {
    signature: Signature,
    doc: Option<String>,
    func: Box<HandlerFn>,
}

impl FunctionHandler {
    /// Wraps a closure.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Args) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            signature: Signature::new(),
            doc: None,
            func: Box::new(func),
        }
    }

    /// Sets the signature.
    #[must_use]
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Attaches a doc block.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Calls the function.
    pub fn call(&self, args: &Args) -> HandlerResult {
        (self.func)(args)
    }
}

impl fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionHandler")
            .field("signature", &self.signature)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// A registered handler.
#[derive(Clone)]
pub enum Handler {
    /// A named method on a resource.
    BoundMethod {
        /// The owning resource.
        resource: Arc<dyn Resource>,
        /// The method name.
        method: String,
    },
    /// A free function.
    FreeFunction(Arc<FunctionHandler>),
}

impl Handler {
    /// Binds a method of `resource`.
    #[must_use]
    pub fn method(resource: Arc<dyn Resource>, method: impl Into<String>) -> Self {
        Self::BoundMethod {
            resource,
            method: method.into(),
        }
    }

    /// Wraps a free function.
    #[must_use]
    pub fn function(func: FunctionHandler) -> Self {
        Self::FreeFunction(Arc::new(func))
    }

    /// Method name for bound handlers.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Self::BoundMethod { method, .. } => Some(method),
            Self::FreeFunction(_) => None,
        }
    }

    /// Returns the signature and parsed doc block.
    ///
    /// `None` for a bound method the resource does not declare.
    #[must_use]
    pub fn declaration(&self) -> Option<(Signature, DocBlock)> {
        match self {
            Self::BoundMethod { resource, method } => resource
                .methods()
                .into_iter()
                .find(|decl| decl.name == *method)
                .map(|decl| {
                    let doc = decl.doc.as_deref().map(DocBlock::parse).unwrap_or_default();
                    (decl.signature, doc)
                }),
            Self::FreeFunction(func) => Some((
                func.signature.clone(),
                func.doc.as_deref().map(DocBlock::parse).unwrap_or_default(),
            )),
        }
    }

    /// Invokes the handler.
    pub fn invoke(&self, args: &Args) -> Result<Value, DispatchError> {
        match self {
            Self::BoundMethod { resource, method } => match resource.call(method, args) {
                Some(result) => result.map_err(DispatchError::from),
                None => Err(DispatchError::method_not_found(method.as_str(), resource.name())),
            },
            Self::FreeFunction(func) => func.call(args).map_err(DispatchError::from),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoundMethod { resource, method } => f
                .debug_struct("BoundMethod")
                .field("resource", &resource.name())
                .field("method", method)
                .finish(),
            Self::FreeFunction(func) => f.debug_tuple("FreeFunction").field(func).finish(),
        }
    }
}

impl From<FunctionHandler> for Handler {
    fn from(func: FunctionHandler) -> Self {
        Self::function(func)
    }
}
