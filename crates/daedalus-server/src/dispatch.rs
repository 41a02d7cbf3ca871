//! Resolution, invocation and formatting of one request.
//!
//! A request walks the tree pre-order: every child gets a chance first,
//! then the controller itself if its prefix covers the URI. Only the root
//! answers a URI nobody resolves.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use daedalus_core::description::join_uri;
use daedalus_core::{bind, Captures, DispatchError, HandlerError, RequestContext, ResponseEnvelope};
use daedalus_format::{negotiate, FormattedResponse, OutputFormat, TEXT_CONTENT_TYPE};
use daedalus_router::VerbKey;
use http::{Method, StatusCode};
use serde_json::Value;

use crate::controller::{ApiSpec, ControllerId, RouteEntry, Settings};
use crate::hooks::AccessRequest;
use crate::url::{normalize_url, relative_uri};
use crate::Server;

/// One request on its way through the tree.
struct Call<'a> {
    ctx: &'a RequestContext,
    uri: String,
    verb: Method,
    format: OutputFormat,
}

enum Reply {
    Envelope {
        envelope: ResponseEnvelope,
        unescape: bool,
        suppress_status_code: bool,
    },
    /// Sent as compact JSON with status 200.
    Document(Value),
}

/// The reply and the controller whose settings format it.
struct Outcome {
    controller: ControllerId,
    reply: Reply,
}

impl Outcome {
    fn envelope(controller: ControllerId, envelope: ResponseEnvelope) -> Self {
        Self {
            controller,
            reply: Reply::Envelope {
                envelope,
                unescape: false,
                suppress_status_code: false,
            },
        }
    }
}

impl Server {
    /// Dispatches a request and formats the reply.
    ///
    /// Never fails: resolution, binding and handler errors all become error
    /// envelopes.
    pub fn dispatch(&self, ctx: &RequestContext) -> FormattedResponse {
        let root = &self.node(ControllerId::ROOT).settings;
        let negotiated = negotiate(ctx.accept(), ctx.uri(), root.default_format);
        let format = ctx
            .format()
            .and_then(|token| OutputFormat::from_token(&token))
            .unwrap_or(negotiated.format);

        let call = Call {
            ctx,
            uri: normalize_url(&negotiated.uri),
            verb: ctx.effective_method(),
            format,
        };

        let outcome = self
            .run(ControllerId::ROOT, &call)
            .unwrap_or_else(|| self.unresolved(&call.uri, &call));
        self.respond(outcome, &call)
    }

    fn run(&self, id: ControllerId, call: &Call<'_>) -> Option<Outcome> {
        let node = self.node(id);
        for &child in &node.children {
            if let Some(outcome) = self.run(child, call) {
                return Some(outcome);
            }
        }

        let relative = relative_uri(&node.prefix, &call.uri)?;
        let found = node.routes.resolve(relative, &call.verb);

        if call.verb == Method::OPTIONS
            && node.settings.describe_routes
            && found
                .as_ref()
                .map_or(true, |m| m.verb != VerbKey::Method(Method::OPTIONS))
        {
            let filter = (!relative.is_empty()).then_some(relative);
            let description = self.describe_node(id, filter, true);
            tracing::debug!(controller = %node.prefix, uri = relative, "describing routes");
            let envelope = match serde_json::to_value(&description) {
                Ok(value) => ResponseEnvelope::success(value),
                Err(err) => HandlerError::exception(err.to_string()).to_envelope(node.settings.debug_mode),
            };
            return Some(Outcome::envelope(id, envelope));
        }

        let Some(found) = found else {
            if relative == "spec" && call.verb == Method::GET {
                if let Some(spec) = &node.settings.api_spec {
                    return Some(self.specification(id, spec, call));
                }
            }
            return (id == ControllerId::ROOT).then(|| self.unresolved(relative, call));
        };

        tracing::debug!(
            controller = %node.prefix,
            pattern = found.pattern,
            verb = found.verb.as_str(),
            "resolved route"
        );
        Some(self.invoke(id, found.handler, found.captures, found.pattern, call))
    }

    /// Answers a URI no controller resolved: the root fallback, or
    /// `RouteNotFoundException` naming `uri`.
    fn unresolved(&self, uri: &str, call: &Call<'_>) -> Outcome {
        let root = self.node(ControllerId::ROOT);
        if let Some(fallback) = &root.fallback {
            return self.invoke(ControllerId::ROOT, fallback, Captures::new(), "", call);
        }
        tracing::debug!(uri, verb = %call.verb, "no route");
        let envelope = DispatchError::route_not_found(uri).to_envelope(root.settings.debug_mode);
        Outcome::envelope(ControllerId::ROOT, envelope)
    }

    fn invoke(
        &self,
        id: ControllerId,
        entry: &RouteEntry,
        captures: Captures,
        pattern: &str,
        call: &Call<'_>,
    ) -> Outcome {
        let settings = &self.node(id).settings;
        let descriptor = &entry.descriptor;
        let reply = |envelope| Outcome {
            controller: id,
            reply: Reply::Envelope {
                envelope,
                unescape: descriptor.unescape,
                suppress_status_code: descriptor.suppress_status_code,
            },
        };

        let args = match bind(descriptor, call.ctx, &captures, call.verb.clone()) {
            Ok(args) => args,
            Err(err) => {
                tracing::debug!(pattern, error = %err, "binding failed");
                return reply(err.to_envelope(settings.debug_mode));
            }
        };

        if let Some(hook) = &settings.access_hook {
            let request = AccessRequest {
                url: &call.uri,
                pattern,
                verb: &call.verb,
                args: &args,
            };
            if let Err(err) = hook(&request) {
                return reply(handler_failure(settings, &err));
            }
        }

        let envelope = match panic::catch_unwind(AssertUnwindSafe(|| entry.handler.invoke(&args))) {
            Ok(Ok(data)) => ResponseEnvelope::success(data),
            Ok(Err(DispatchError::Handler(err))) => handler_failure(settings, &err),
            Ok(Err(err)) => err.to_envelope(settings.debug_mode),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(pattern, verb = %call.verb, panic = %message, "handler panicked");
                handler_failure(settings, &HandlerError::panic(message))
            }
        };
        reply(envelope)
    }

    /// Builds the OpenAPI document for `id` and its subtree.
    fn specification(&self, id: ControllerId, spec: &ApiSpec, call: &Call<'_>) -> Outcome {
        let mime = match call.format {
            OutputFormat::Xml => "application/xml",
            OutputFormat::Text => "text/plain",
            OutputFormat::Json | OutputFormat::Custom => "application/json",
        };
        let mut generator = spec.generator().output_mime(mime);
        let documented = if spec.recurse { self.subtree(id) } else { vec![id] };
        for controller in documented {
            let node = self.node(controller);
            if node.settings.api_spec.is_some() {
                generator = generator.spec_path(join_uri(&node.prefix, "spec"));
            }
        }

        let description = self.describe_node(id, None, true);
        match generator.generate(&description).and_then(|doc| doc.to_value()) {
            Ok(document) => Outcome {
                controller: id,
                reply: Reply::Document(document),
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to generate API specification");
                let settings = &self.node(id).settings;
                Outcome::envelope(id, HandlerError::exception(err.to_string()).to_envelope(settings.debug_mode))
            }
        }
    }

    fn respond(&self, outcome: Outcome, call: &Call<'_>) -> FormattedResponse {
        let node = self.node(outcome.controller);
        let formatter = &node.settings.formatter;
        let rendered = match &outcome.reply {
            Reply::Document(document) => formatter.render_raw_json(document, StatusCode::OK),
            Reply::Envelope {
                envelope,
                unescape,
                suppress_status_code,
            } => {
                let status = if *suppress_status_code
                    || call.ctx.suppress_status_code()
                    || !node.settings.http_status_codes
                {
                    StatusCode::OK
                } else {
                    StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                };
                formatter.render(&envelope.to_value(), call.format, status, *unescape)
            }
        };

        let response = rendered.unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to format response");
            FormattedResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                TEXT_CONTENT_TYPE,
                format!("failed to format response: {err}"),
            )
        });

        tracing::info!(
            verb = %call.verb,
            uri = %call.uri,
            status = response.status().as_u16(),
            format = %call.format,
            controller = %node.prefix,
            "dispatched request"
        );
        response
    }
}

/// Runs the exception hook, then builds the error envelope.
fn handler_failure(settings: &Settings, err: &HandlerError) -> ResponseEnvelope {
    tracing::warn!(kind = err.kind(), status = err.status(), error = %err, "handler failed");
    if let Some(hook) = &settings.exception_hook {
        if let Some(envelope) = hook(err) {
            return envelope;
        }
    }
    err.to_envelope(settings.debug_mode)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
