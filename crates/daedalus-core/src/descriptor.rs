//! Handler metadata.
//!
//! A [`Signature`] is what a handler declares: parameter names, types and
//! defaults. [`HandlerDescriptor::build`] combines it with the handler's
//! [`DocBlock`] into the metadata used for binding, `OPTIONS` descriptions
//! and API specifications. Requiredness always comes from the signature
//! (a parameter without a default is required), never from documentation.

use std::fmt;

use http::Method;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::binder::COLLECT_ALL;
use crate::doc::DocBlock;
use crate::VerbKey;

/// A parameter type as written in docs or declared in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `int`, `integer`
    Integer,
    /// `bool`, `boolean`
    Boolean,
    /// `string`
    String,
    /// `number`, `float`, `double`
    Number,
    /// `array` or any `T[]`
    Array,
    /// `object`
    Object,
    /// `mixed` or no type at all
    Mixed,
    /// Any other name, kept verbatim.
    Named(String),
}

impl TypeTag {
    /// Parses a type name. Empty names are [`TypeTag::Mixed`].
    ///
    /// ```
    /// use daedalus_core::TypeTag;
    ///
    /// assert_eq!(TypeTag::parse("int"), TypeTag::Integer);
    /// assert_eq!(TypeTag::parse("string[]"), TypeTag::Array);
    /// assert_eq!(TypeTag::parse("User"), TypeTag::Named("User".to_string()));
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.ends_with("[]") {
            return Self::Array;
        }
        match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Self::Integer,
            "bool" | "boolean" => Self::Boolean,
            "string" => Self::String,
            "number" | "float" | "double" => Self::Number,
            "array" => Self::Array,
            "object" => Self::Object,
            "" | "mixed" => Self::Mixed,
            _ => Self::Named(name.to_string()),
        }
    }

    /// Canonical name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::Mixed => "mixed",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where a parameter is expected to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Query string.
    Query,
    /// Request body.
    Body,
    /// Regex capture group at this index.
    PathCapture(usize),
}

impl ParamSource {
    /// `query`, `body` or `path`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
            Self::PathCapture(_) => "path",
        }
    }
}

/// One declared parameter of a [`Signature`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    /// Declared name.
    pub name: String,
    /// Declared type, if the signature carries one.
    pub ty: Option<TypeTag>,
    /// Default value; `None` makes the parameter required.
    pub default: Option<Value>,
}

/// The declared parameters of a handler, in order.
///
/// # Example
///
/// ```
/// use daedalus_core::{Signature, TypeTag};
/// use serde_json::json;
///
/// let signature = Signature::new()
///     .param("username")
///     .typed_param("ids", TypeTag::Array)
///     .optional_param("page", json!(1));
///
/// assert_eq!(signature.params().len(), 3);
/// assert!(signature.params()[2].default.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<ParamDecl>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required, untyped parameter.
    #[must_use]
    pub fn param(self, name: impl Into<String>) -> Self {
        self.push(name.into(), None, None)
    }

    /// Adds a required, typed parameter.
    #[must_use]
    pub fn typed_param(self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.push(name.into(), Some(ty), None)
    }

    /// Adds an optional parameter with a default.
    #[must_use]
    pub fn optional_param(self, name: impl Into<String>, default: Value) -> Self {
        self.push(name.into(), None, Some(default))
    }

    /// Adds the collect-all `_` parameter.
    #[must_use]
    pub fn collect_all(self) -> Self {
        self.push(COLLECT_ALL.to_string(), Some(TypeTag::Object), Some(Value::Null))
    }

    fn push(mut self, name: String, ty: Option<TypeTag>, default: Option<Value>) -> Self {
        self.params.push(ParamDecl { name, ty, default });
        self
    }

    /// Returns the declared parameters.
    #[must_use]
    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }
}

/// Drops a one-letter lowercase prefix: `pUsername` becomes `username`.
///
/// ```
/// use daedalus_core::argument_name;
///
/// assert_eq!(argument_name("pUsername"), "username");
/// assert_eq!(argument_name("username"), "username");
/// assert_eq!(argument_name("ID"), "ID");
/// ```
#[must_use]
pub fn argument_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_ascii_lowercase() && second.is_ascii_uppercase() => {
            let mut out = String::with_capacity(name.len() - 1);
            out.push(second.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        _ => name.to_string(),
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    /// Parameter type.
    pub ty: TypeTag,
    /// True when the signature has no default.
    pub required: bool,
    /// Declared default.
    pub default: Option<Value>,
    /// Expected source.
    pub source: ParamSource,
    /// From the `@param` tag.
    pub description: Option<String>,
}

impl Serialize for ParamInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.ty)?;
        map.serialize_entry("required", &self.required)?;
        if let Some(default) = &self.default {
            map.serialize_entry("default", default)?;
        }
        map.serialize_entry("in", self.source.as_str())?;
        if let ParamSource::PathCapture(index) = self.source {
            map.serialize_entry("fromRegex", &format!("${}", index + 1))?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        map.end()
    }
}

/// Return type metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnInfo {
    /// Declared type, `mixed` by default.
    #[serde(rename = "type")]
    pub ty: TypeTag,
    /// From the `@return` tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for ReturnInfo {
    fn default() -> Self {
        Self {
            ty: TypeTag::Mixed,
            description: None,
        }
    }
}

/// Normalized metadata for a registered handler.
///
/// Built once at registration and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandlerDescriptor {
    /// Parameters by (normalized) name, in declaration order.
    pub parameters: IndexMap<String, ParamInfo>,
    /// Return type.
    #[serde(rename = "return")]
    pub returns: ReturnInfo,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `@url` overrides.
    #[serde(rename = "url", skip_serializing_if = "Vec::is_empty")]
    pub url_overrides: Vec<String>,
    /// `@openapi-url` override.
    #[serde(rename = "openapiUrl", skip_serializing_if = "Option::is_none")]
    pub openapi_url: Option<String>,
    /// `@openapi-ignore`
    #[serde(skip)]
    pub openapi_ignore: bool,
    /// `@unescape true`: leave `/` unescaped in JSON output.
    #[serde(skip)]
    pub unescape: bool,
    /// `@suppress-status-code`: always send transport status 200.
    #[serde(skip)]
    pub suppress_status_code: bool,
}

impl HandlerDescriptor {
    /// Builds a descriptor.
    ///
    /// The first `capture_count` parameters are sourced from the route's
    /// regex captures; the rest from the body for POST, PUT and PATCH and
    /// from the query otherwise.
    #[must_use]
    pub fn build(signature: &Signature, doc: &DocBlock, capture_count: usize, verb: &VerbKey) -> Self {
        let body_verb = matches!(
            verb.method(),
            Some(m) if *m == Method::POST || *m == Method::PUT || *m == Method::PATCH
        );

        let mut parameters = IndexMap::new();
        let mut position = 0;
        for decl in signature.params() {
            let tag = doc.param(&decl.name);
            let ty = tag
                .and_then(|t| t.ty.as_deref())
                .map(TypeTag::parse)
                .or_else(|| decl.ty.clone())
                .unwrap_or(TypeTag::Mixed);

            let source = if decl.name == COLLECT_ALL {
                ParamSource::Query
            } else {
                let source = if position < capture_count {
                    ParamSource::PathCapture(position)
                } else if body_verb {
                    ParamSource::Body
                } else {
                    ParamSource::Query
                };
                position += 1;
                source
            };

            parameters.insert(
                argument_name(&decl.name),
                ParamInfo {
                    ty,
                    required: decl.default.is_none(),
                    default: decl.default.clone().filter(|d| !d.is_null()),
                    source,
                    description: tag.and_then(|t| t.description.clone()),
                },
            );
        }

        let returns = doc
            .returns
            .as_ref()
            .map(|r| ReturnInfo {
                ty: TypeTag::parse(&r.ty),
                description: r.description.clone(),
            })
            .unwrap_or_default();

        Self {
            parameters,
            returns,
            description: doc.description.clone(),
            url_overrides: doc.urls.clone(),
            openapi_url: doc.openapi_url.clone(),
            openapi_ignore: doc.openapi_ignore,
            unescape: doc.unescape,
            suppress_status_code: doc.suppress_status_code,
        }
    }
}
