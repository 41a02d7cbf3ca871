//! Route table and resolver for Daedalus.
//!
//! A [`RouteTable`] maps URI patterns to a [`MethodRouter`] of per-verb
//! handlers. Patterns are plain strings that double as anchored regular
//! expressions, so `users/(\d+)` answers `users/42` and hands `42` back as a
//! positional capture.
//!
//! # Resolution order
//!
//! 1. exact pattern string and exact verb
//! 2. exact pattern string and the wildcard verb
//! 3. every pattern in insertion order as `^pattern$`; a route whose regex
//!    matches but that has neither the verb nor a wildcard is skipped
//!
//! The first registered regex wins when several could match.
//!
//! Patterns go through the `regex` crate. Those it rejects, such as
//! lookahead groups like `page/(?!admin)(\w+)`, are compiled with
//! `fancy-regex` instead. A pattern neither accepts only matches itself.
//!
//! # Example
//!
//! ```rust
//! use daedalus_router::{RouteTable, VerbKey};
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.insert("users", VerbKey::Method(Method::GET), "listUsers");
//! table.insert(r"users/(\d+)", VerbKey::Any, "user");
//!
//! let found = table.resolve("users/42", &Method::DELETE).unwrap();
//! assert_eq!(*found.handler, "user");
//! assert_eq!(found.captures.get(0), Some("42"));
//! assert_eq!(found.verb, VerbKey::Any);
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod captures;
mod method_router;
mod table;
mod verb;

pub use captures::{Capture, Captures};
pub use method_router::MethodRouter;
pub use table::{Route, RouteTable};
pub use verb::VerbKey;

/// A resolved route: the handler, its captures and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, H> {
    /// The handler registered for the route and verb.
    pub handler: &'a H,
    /// Positional regex captures, left to right.
    pub captures: Captures,
    /// The verb key that answered: the requested verb or the wildcard.
    pub verb: VerbKey,
    /// The pattern string the route was registered under.
    pub pattern: &'a str,
}

impl<'a, H> RouteMatch<'a, H> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(handler: &'a H, captures: Captures, verb: VerbKey, pattern: &'a str) -> Self {
        Self {
            handler,
            captures,
            verb,
            pattern,
        }
    }

    /// Returns true if the wildcard handler answered.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.verb.is_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_route_match_wildcard_flag() {
        let handler = "h";
        let m = RouteMatch::new(&handler, Captures::new(), VerbKey::Any, "test");
        assert!(m.is_wildcard());

        let m = RouteMatch::new(&handler, Captures::new(), VerbKey::Method(Method::GET), "test");
        assert!(!m.is_wildcard());
    }
}
