//! Building an [`OpenApi`] document from a route [`Description`].

use indexmap::IndexMap;

use daedalus_core::description::Description;
use daedalus_core::{HandlerDescriptor, ParamSource, TypeTag, COLLECT_ALL};

use crate::error::{DocsError, DocsResult};
use crate::openapi::{
    Components, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody,
    Response, Schema, SchemaType, Server, OPENAPI_VERSION,
};
use crate::path::template;

/// Schema name of the generic error envelope.
pub const ERROR_SCHEMA: &str = "500";

/// Schema name used for untyped values.
pub const ANY_VALUE_SCHEMA: &str = "AnyValue";

const WILDCARD: &str = "_ALL_";
const WILDCARD_EXPANSION: [&str; 5] = ["get", "post", "put", "patch", "delete"];
const QUERY_VERBS: [&str; 4] = ["get", "delete", "head", "options"];
const FORM_MIME: &str = "application/x-www-form-urlencoded";
const JSON_MIME: &str = "application/json";

/// Generator for OpenAPI documents.
///
/// # Example
///
/// ```rust
/// use daedalus_core::description::{ControllerDescription, Description};
/// use daedalus_docs::OpenApiGenerator;
///
/// let description = Description {
///     parameters: None,
///     controller: ControllerDescription {
///         entry_point: "/".to_string(),
///         routes: Default::default(),
///     },
///     sub_controllers: Default::default(),
/// };
///
/// let spec = OpenApiGenerator::new()
///     .title("Pets")
///     .version("1.0.0")
///     .generate(&description)
///     .unwrap();
/// assert_eq!(spec.openapi, "3.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    servers: Vec<Server>,
    recurse: bool,
    output_mime: String,
    spec_paths: Vec<String>,
}

impl Default for OpenApiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiGenerator {
    /// Create a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            version: None,
            description: None,
            servers: Vec::new(),
            recurse: true,
            output_mime: JSON_MIME.to_string(),
            spec_paths: Vec::new(),
        }
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a server.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: None,
        });
        self
    }

    /// Whether sub-controllers are included. Defaults to true.
    #[must_use]
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// The MIME type documented for responses. Defaults to `application/json`.
    #[must_use]
    pub fn output_mime(mut self, mime: impl Into<String>) -> Self {
        self.output_mime = mime.into();
        self
    }

    /// Documents a path the document itself is served from.
    ///
    /// May be called once per controller that serves the document.
    #[must_use]
    pub fn spec_path(mut self, path: impl Into<String>) -> Self {
        self.spec_paths.push(path.into());
        self
    }

    /// Generate the document.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::MissingField`] if no title or version was set.
    pub fn generate(&self, description: &Description) -> DocsResult<OpenApi> {
        let info = Info {
            title: self.title.clone().ok_or_else(|| missing("title"))?,
            version: self.version.clone().ok_or_else(|| missing("version"))?,
            description: self.description.clone(),
        };

        let controllers: Box<dyn Iterator<Item = &Description> + '_> = if self.recurse {
            description.walk()
        } else {
            Box::new(std::iter::once(description))
        };

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for controller in controllers {
            for route in controller.controller.routes.values() {
                for (verb, descriptor) in &route.methods {
                    if descriptor.openapi_ignore {
                        tracing::debug!(uri = %route.uri, verb = %verb, "skipping ignored operation");
                        continue;
                    }
                    let verbs: Vec<String> = if verb == WILDCARD {
                        WILDCARD_EXPANSION
                            .iter()
                            .filter(|v| !route.methods.contains_key(&v.to_ascii_uppercase()))
                            .map(|v| (*v).to_string())
                            .collect()
                    } else {
                        vec![verb.to_ascii_lowercase()]
                    };
                    for verb in verbs {
                        let (path, operation) = self.operation(&route.uri, &verb, descriptor);
                        if let Some(slot) = paths.entry(path).or_default().slot_mut(&verb) {
                            *slot = Some(operation);
                        }
                    }
                }
            }
        }

        for spec_path in &self.spec_paths {
            let item = paths.entry(spec_path.clone()).or_default();
            if item.get.is_none() {
                item.get = Some(self.spec_operation());
            }
        }

        paths.retain(|_, item| !item.is_empty());
        paths.sort_keys();

        Ok(OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            servers: self.servers.clone(),
            paths,
            components: Some(components()),
        })
    }

    fn operation(&self, uri: &str, verb: &str, descriptor: &HandlerDescriptor) -> (String, Operation) {
        let (path, path_params) = match &descriptor.openapi_url {
            Some(url) => {
                let used: Vec<String> = descriptor
                    .parameters
                    .keys()
                    .filter(|name| url.contains(&format!("{{{name}}}")))
                    .cloned()
                    .collect();
                (url.clone(), used)
            }
            None => {
                let mut captures: Vec<(usize, &str)> = descriptor
                    .parameters
                    .iter()
                    .filter_map(|(name, info)| match info.source {
                        ParamSource::PathCapture(index) => Some((index, name.as_str())),
                        _ => None,
                    })
                    .collect();
                captures.sort_by_key(|(index, _)| *index);
                let names: Vec<&str> = captures.into_iter().map(|(_, name)| name).collect();
                let templated = template(uri, &names);
                (templated.path, templated.used)
            }
        };

        let in_query = QUERY_VERBS.contains(&verb);
        let mut parameters = Vec::new();
        let mut properties = IndexMap::new();
        let mut body_required = false;

        for (name, info) in &descriptor.parameters {
            if name == COLLECT_ALL {
                continue;
            }
            let schema = schema_for(&info.ty);
            if path_params.contains(name) {
                parameters.push(Parameter {
                    location: ParameterIn::Path,
                    name: name.clone(),
                    required: true,
                    schema,
                    description: info.description.clone(),
                });
            } else if in_query {
                parameters.push(Parameter {
                    location: ParameterIn::Query,
                    name: name.clone(),
                    required: info.required,
                    schema,
                    description: info.description.clone(),
                });
            } else {
                body_required |= info.required;
                properties.insert(name.clone(), schema);
            }
        }

        let request_body = (!in_query).then(|| {
            let schema = Schema {
                properties,
                ..Schema::object()
            };
            let mut content = IndexMap::new();
            content.insert(JSON_MIME.to_string(), MediaType { schema: schema.clone() });
            content.insert(FORM_MIME.to_string(), MediaType { schema });
            RequestBody {
                required: body_required,
                content,
            }
        });

        let operation = Operation {
            summary: None,
            description: descriptor.description.clone(),
            parameters,
            request_body,
            responses: self.responses(schema_for(&descriptor.returns.ty)),
        };
        (path, operation)
    }

    fn responses(&self, data: Schema) -> IndexMap<String, Response> {
        let envelope = Schema::object()
            .property("status", Schema::typed(SchemaType::Integer))
            .property("data", data);

        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "Successful operation".to_string(),
                content: self.content(envelope),
            },
        );
        responses.insert(
            "500".to_string(),
            Response {
                description: "Internal Server Error".to_string(),
                content: self.content(Schema::reference(schema_ref(ERROR_SCHEMA))),
            },
        );
        responses
    }

    fn content(&self, schema: Schema) -> IndexMap<String, MediaType> {
        let mut content = IndexMap::new();
        content.insert(self.output_mime.clone(), MediaType { schema });
        content
    }

    fn spec_operation(&self) -> Operation {
        let mut content = IndexMap::new();
        content.insert(JSON_MIME.to_string(), MediaType { schema: Schema::object() });
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: "OpenAPI document".to_string(),
                content,
            },
        );
        Operation {
            summary: Some("OpenAPI specification".to_string()),
            description: None,
            parameters: Vec::new(),
            request_body: None,
            responses,
        }
    }
}

/// Maps a parameter or return type to a schema.
#[must_use]
pub fn schema_for(ty: &TypeTag) -> Schema {
    match ty {
        TypeTag::Integer => Schema::typed(SchemaType::Integer),
        TypeTag::Boolean => Schema::typed(SchemaType::Boolean),
        TypeTag::String => Schema::typed(SchemaType::String),
        TypeTag::Number => Schema::typed(SchemaType::Number),
        TypeTag::Array => Schema::array(Schema::default()),
        TypeTag::Object => Schema::object(),
        TypeTag::Mixed | TypeTag::Named(_) => Schema::reference(schema_ref(ANY_VALUE_SCHEMA)),
    }
}

fn schema_ref(name: &str) -> String {
    format!("#/components/schemas/{name}")
}

fn components() -> Components {
    let error = Schema::object()
        .property("status", Schema::typed(SchemaType::Integer))
        .property("error", Schema::typed(SchemaType::String))
        .property("message", Schema::object());

    let mut schemas = IndexMap::new();
    schemas.insert(ERROR_SCHEMA.to_string(), error);
    schemas.insert(ANY_VALUE_SCHEMA.to_string(), Schema::default());
    Components { schemas }
}

fn missing(field: &str) -> DocsError {
    DocsError::MissingField {
        field: field.to_string(),
    }
}
