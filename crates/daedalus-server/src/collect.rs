//! Route names derived from resource method names.
//!
//! `getStats` answers `GET stats`, `postUserLogin` answers `POST user-login`
//! and `allTest` answers every verb at `test`.

use daedalus_router::VerbKey;

/// Splits a method name into its verb prefix and route path.
///
/// The verb is the leading run of lowercase letters; the path is the rest,
/// converted to dash case. `None` if the prefix is not a known verb.
pub(crate) fn route_for_method(name: &str) -> Option<(VerbKey, String)> {
    let split = name
        .find(|c: char| c.is_ascii_uppercase())
        .unwrap_or(name.len());
    let (verb, rest) = name.split_at(split);
    let verb = match verb {
        "all" => VerbKey::Any,
        verb => VerbKey::parse(verb).filter(|key| !key.is_any())?,
    };
    Some((verb, camel_to_dashes(rest)))
}

/// `MethodWithoutDocs` → `method-without-docs`.
///
/// A dash goes between a lowercase letter and the uppercase letter after it;
/// runs of capitals stay together.
pub(crate) fn camel_to_dashes(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous_lower = false;
    for c in name.chars() {
        if previous_lower && c.is_ascii_uppercase() {
            out.push('-');
        }
        previous_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_camel_to_dashes() {
        assert_eq!(camel_to_dashes("Stats"), "stats");
        assert_eq!(camel_to_dashes("MethodWithoutDocs"), "method-without-docs");
        assert_eq!(camel_to_dashes("HTMLPage"), "htmlpage");
        assert_eq!(camel_to_dashes("User2Fa"), "user2fa");
        assert_eq!(camel_to_dashes(""), "");
    }

    #[test]
    fn test_route_for_method() {
        assert_eq!(
            route_for_method("getStats"),
            Some((VerbKey::Method(Method::GET), "stats".to_string()))
        );
        assert_eq!(
            route_for_method("postLogin"),
            Some((VerbKey::Method(Method::POST), "login".to_string()))
        );
        assert_eq!(
            route_for_method("getMethodWithoutDocs"),
            Some((VerbKey::Method(Method::GET), "method-without-docs".to_string()))
        );
    }

    #[test]
    fn test_route_for_all() {
        assert_eq!(route_for_method("allTest"), Some((VerbKey::Any, "test".to_string())));
        assert_eq!(route_for_method("all"), Some((VerbKey::Any, String::new())));
    }

    #[test]
    fn test_route_for_unknown_verb() {
        assert_eq!(route_for_method("helperMethod"), None);
        assert_eq!(route_for_method("Stats"), None);
        assert_eq!(route_for_method("index"), None);
        assert_eq!(route_for_method("anyTest"), None);
    }
}
