//! Argument binding.
//!
//! [`bind`] resolves every descriptor parameter, in order, from the first
//! source that has it:
//!
//! 1. query parameter
//! 2. decoded body field
//! 3. the raw payload, for POST, PUT and PATCH: JSON object first, form
//!    encoding if that fails
//! 4. the positional regex capture, for capture-sourced parameters
//! 5. the declared default
//!
//! Null values count as absent. The collect-all parameter [`COLLECT_ALL`]
//! instead receives every underscore-prefixed query parameter except
//! [`SUPPRESS_STATUS_CODE`].

use std::cell::OnceCell;

use http::Method;
use serde_json::{Map, Value};

use crate::context::{decode_form, RequestContext};
use crate::descriptor::{HandlerDescriptor, ParamSource};
use crate::error::{DispatchError, DispatchResult};
use crate::handler::Args;
use crate::Captures;

/// Name of the parameter that collects underscore-prefixed query values.
pub const COLLECT_ALL: &str = "_";

/// Query flag forcing transport status 200.
pub const SUPPRESS_STATUS_CODE: &str = "_suppress_status_code";

/// Binds request data to the parameters of `descriptor`.
///
/// # Example
///
/// ```
/// use daedalus_core::{bind, Captures, DocBlock, HandlerDescriptor, RequestContext, Signature, VerbKey};
/// use http::Method;
///
/// let signature = Signature::new().param("username").param("password");
/// let descriptor = HandlerDescriptor::build(
///     &signature,
///     &DocBlock::default(),
///     0,
///     &VerbKey::Method(Method::POST),
/// );
///
/// let ctx = RequestContext::new(Method::POST, "/login").with_query_string("username=a");
/// let err = bind(&descriptor, &ctx, &Captures::new(), Method::POST).unwrap_err();
/// assert_eq!(err.to_string(), "Argument 'password' is missing.");
/// ```
pub fn bind(
    descriptor: &HandlerDescriptor,
    ctx: &RequestContext,
    captures: &Captures,
    verb: Method,
) -> DispatchResult<Args> {
    let payload: OnceCell<Map<String, Value>> = OnceCell::new();
    let payload_fields = || {
        payload.get_or_init(|| {
            let method = ctx.method();
            if *method == Method::POST || *method == Method::PUT || *method == Method::PATCH {
                decode_payload(ctx.payload())
            } else {
                Map::new()
            }
        })
    };

    let mut args = Args::new(verb);
    for (name, info) in &descriptor.parameters {
        if name == COLLECT_ALL {
            let collected: Map<String, Value> = ctx
                .query()
                .iter()
                .filter(|(k, _)| k.starts_with('_') && k.as_str() != SUPPRESS_STATUS_CODE)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            args.insert(name.as_str(), Value::Object(collected));
            continue;
        }

        let present = |map: &Map<String, Value>| map.get(name).filter(|v| !v.is_null()).cloned();
        let value = present(ctx.query())
            .or_else(|| present(ctx.body()))
            .or_else(|| present(payload_fields()))
            .or_else(|| match info.source {
                ParamSource::PathCapture(index) => {
                    captures.get(index).map(|s| Value::String(s.to_string()))
                }
                _ => None,
            })
            .or_else(|| info.default.clone());

        match value {
            Some(value) => args.insert(name.as_str(), value),
            None if !info.required => args.insert(name.as_str(), Value::Null),
            None => return Err(DispatchError::missing_argument(name.as_str())),
        }
    }
    Ok(args)
}

/// Structured decoding first, form decoding as the fallback.
fn decode_payload(payload: &[u8]) -> Map<String, Value> {
    if payload.is_empty() {
        return Map::new();
    }
    match serde_json::from_slice::<Value>(payload) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::trace!("request payload is not a JSON object, decoding as form");
            decode_form(payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocBlock, Signature, VerbKey};
    use serde_json::json;

    fn descriptor(signature: &Signature, captures: usize, verb: Method) -> HandlerDescriptor {
        HandlerDescriptor::build(signature, &DocBlock::default(), captures, &VerbKey::Method(verb))
    }

    fn login() -> HandlerDescriptor {
        descriptor(&Signature::new().param("username").param("password"), 0, Method::POST)
    }

    #[test]
    fn test_missing_first_required() {
        let ctx = RequestContext::new(Method::POST, "/login");
        let err = bind(&login(), &ctx, &Captures::new(), Method::POST).unwrap_err();
        assert_eq!(err.to_string(), "Argument 'username' is missing.");
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_binds_from_query() {
        let ctx = RequestContext::new(Method::POST, "/login").with_query_string("username=a&password=b");
        let args = bind(&login(), &ctx, &Captures::new(), Method::POST).unwrap();
        assert_eq!(args.get_str("username"), Some("a"));
        assert_eq!(args.get_str("password"), Some("b"));
    }

    #[test]
    fn test_query_beats_body() {
        let ctx = RequestContext::new(Method::POST, "/login")
            .with_query("username", "q")
            .with_body_field("username", "b")
            .with_body_field("password", "p");
        let args = bind(&login(), &ctx, &Captures::new(), Method::POST).unwrap();
        assert_eq!(args.get_str("username"), Some("q"));
        assert_eq!(args.get_str("password"), Some("p"));
    }

    #[test]
    fn test_json_payload() {
        let ctx = RequestContext::new(Method::PUT, "/login")
            .with_payload(r#"{"username": "a", "password": {"hash": "x"}}"#);
        let args = bind(&login(), &ctx, &Captures::new(), Method::PUT).unwrap();
        assert_eq!(args.get("password"), Some(&json!({"hash": "x"})));
    }

    #[test]
    fn test_malformed_json_falls_back_to_form() {
        let ctx = RequestContext::new(Method::POST, "/login").with_payload("username=a&password=b");
        let args = bind(&login(), &ctx, &Captures::new(), Method::POST).unwrap();
        assert_eq!(args.get_str("username"), Some("a"));
    }

    #[test]
    fn test_payload_ignored_for_get() {
        let d = descriptor(&Signature::new().param("username"), 0, Method::GET);
        let ctx = RequestContext::new(Method::GET, "/login").with_payload("username=a");
        assert!(bind(&d, &ctx, &Captures::new(), Method::GET).is_err());
    }

    #[test]
    fn test_capture_then_default() {
        let d = descriptor(
            &Signature::new().param("id").optional_param("page", json!(1)),
            1,
            Method::GET,
        );
        let captures: Captures = vec![Some("42".to_string())].into_iter().collect();
        let ctx = RequestContext::new(Method::GET, "/item/42");

        let args = bind(&d, &ctx, &captures, Method::GET).unwrap();
        assert_eq!(args.get_str("id"), Some("42"));
        assert_eq!(args.get("page"), Some(&json!(1)));
    }

    #[test]
    fn test_query_beats_capture() {
        let d = descriptor(&Signature::new().param("id"), 1, Method::GET);
        let captures: Captures = vec![Some("42".to_string())].into_iter().collect();
        let ctx = RequestContext::new(Method::GET, "/item/42").with_query("id", "7");

        let args = bind(&d, &ctx, &captures, Method::GET).unwrap();
        assert_eq!(args.get_str("id"), Some("7"));
    }

    #[test]
    fn test_unmatched_capture_is_missing() {
        let d = descriptor(&Signature::new().param("id"), 1, Method::GET);
        let captures: Captures = vec![None].into_iter().collect();
        let ctx = RequestContext::new(Method::GET, "/item");

        let err = bind(&d, &ctx, &captures, Method::GET).unwrap_err();
        assert_eq!(err.to_string(), "Argument 'id' is missing.");
    }

    #[test]
    fn test_null_counts_as_absent() {
        let d = descriptor(&Signature::new().param("name"), 0, Method::POST);
        let ctx = RequestContext::new(Method::POST, "/x").with_payload(r#"{"name": null}"#);
        assert!(bind(&d, &ctx, &Captures::new(), Method::POST).is_err());
    }

    #[test]
    fn test_collect_all() {
        let d = descriptor(&Signature::new().collect_all(), 0, Method::GET);
        let ctx = RequestContext::new(Method::GET, "/x")
            .with_query_string("_a=1&_b=2&c=3&_suppress_status_code=1");

        let args = bind(&d, &ctx, &Captures::new(), Method::GET).unwrap();
        assert_eq!(args.get("_"), Some(&json!({"_a": "1", "_b": "2"})));
    }

    #[test]
    fn test_effective_verb_is_recorded() {
        let d = descriptor(&Signature::new(), 0, Method::GET);
        let ctx = RequestContext::new(Method::POST, "/x");
        let args = bind(&d, &ctx, &Captures::new(), Method::DELETE).unwrap();
        assert_eq!(args.verb(), &Method::DELETE);
        assert!(args.is_empty());
    }
}
