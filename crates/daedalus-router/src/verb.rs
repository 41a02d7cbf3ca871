//! Verb keys for route registration.

use std::fmt;

use http::Method;

/// The verb a handler is registered under.
///
/// `Any` is the wildcard: it answers every verb that has no handler of its
/// own on the same route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VerbKey {
    /// A concrete HTTP method.
    Method(Method),
    /// The wildcard verb.
    Any,
}

impl VerbKey {
    /// The verbs accepted from clients and verb-override parameters.
    pub const SUPPORTED: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::PATCH,
    ];

    /// Parses a lowercase or uppercase verb name.
    ///
    /// `all` and `any` map to the wildcard; names outside
    /// [`VerbKey::SUPPORTED`] yield `None`.
    ///
    /// ```rust
    /// use daedalus_router::VerbKey;
    /// use http::Method;
    ///
    /// assert_eq!(VerbKey::parse("post"), Some(VerbKey::Method(Method::POST)));
    /// assert_eq!(VerbKey::parse("all"), Some(VerbKey::Any));
    /// assert_eq!(VerbKey::parse("fetch"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        if upper == "ALL" || upper == "ANY" || upper == "_ALL_" {
            return Some(Self::Any);
        }
        Self::SUPPORTED
            .iter()
            .find(|m| m.as_str() == upper)
            .map(|m| Self::Method(m.clone()))
    }

    /// Returns true for the wildcard.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the concrete method, if any.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        match self {
            Self::Method(m) => Some(m),
            Self::Any => None,
        }
    }

    /// Uppercase name used in descriptions: `GET`, `POST`, `_ALL_`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Method(m) => m.as_str(),
            Self::Any => "_ALL_",
        }
    }
}

impl From<Method> for VerbKey {
    fn from(method: Method) -> Self {
        Self::Method(method)
    }
}

impl fmt::Display for VerbKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(VerbKey::parse("GET"), Some(VerbKey::Method(Method::GET)));
        assert_eq!(VerbKey::parse("Patch"), Some(VerbKey::Method(Method::PATCH)));
        assert_eq!(VerbKey::parse("ALL"), Some(VerbKey::Any));
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert_eq!(VerbKey::parse("trace"), None);
        assert_eq!(VerbKey::parse(""), None);
        assert_eq!(VerbKey::parse("method"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(VerbKey::Method(Method::OPTIONS).to_string(), "OPTIONS");
        assert_eq!(VerbKey::Any.to_string(), "_ALL_");
    }

    #[test]
    fn test_method_accessor() {
        assert_eq!(VerbKey::from(Method::PUT).method(), Some(&Method::PUT));
        assert_eq!(VerbKey::Any.method(), None);
    }
}
