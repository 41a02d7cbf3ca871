//! The route table.

use http::Method;
use indexmap::IndexMap;

use crate::{Captures, MethodRouter, RouteMatch, VerbKey};

/// Compiled form of a route pattern.
#[derive(Debug, Clone)]
enum Matcher {
    Regex(regex::Regex),
    /// Patterns that need lookaround.
    Fancy(fancy_regex::Regex),
    Literal,
}

impl Matcher {
    fn compile(pattern: &str) -> Self {
        let anchored = format!("^(?:{pattern})$");
        let rejected = match regex::Regex::new(&anchored) {
            Ok(regex) => return Self::Regex(regex),
            Err(error) => error,
        };
        match fancy_regex::Regex::new(&anchored) {
            Ok(regex) => {
                tracing::debug!(pattern, %rejected, "compiled route pattern with backtracking engine");
                Self::Fancy(regex)
            }
            Err(error) => {
                tracing::warn!(
                    pattern,
                    %error,
                    "route pattern is not a valid regex, matching it literally"
                );
                Self::Literal
            }
        }
    }
}

/// A pattern with its per-verb handlers.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: String,
    /// anchored as `^(?:pattern)$`
    matcher: Matcher,
    methods: MethodRouter<H>,
}

impl<H> Route<H> {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            matcher: Matcher::compile(pattern),
            methods: MethodRouter::new(),
        }
    }

    /// Returns the pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the per-verb handlers.
    #[must_use]
    pub fn methods(&self) -> &MethodRouter<H> {
        &self.methods
    }

    /// Returns true if the pattern only matches itself.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, Matcher::Literal)
    }

    /// Number of capturing groups in the pattern. Lookaround groups do not
    /// count.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        let total = match &self.matcher {
            Matcher::Regex(regex) => regex.captures_len(),
            Matcher::Fancy(regex) => regex.captures_len(),
            Matcher::Literal => 0,
        };
        total.saturating_sub(1)
    }

    /// Matches `uri` against the anchored pattern and collects its groups.
    #[must_use]
    pub fn captures(&self, uri: &str) -> Option<Captures> {
        let mut captures = Captures::new();
        match &self.matcher {
            Matcher::Regex(regex) => {
                let caps = regex.captures(uri)?;
                for (index, name) in regex.capture_names().enumerate().skip(1) {
                    captures.push(name, caps.get(index).map(|m| m.as_str()));
                }
            }
            Matcher::Fancy(regex) => {
                let caps = match regex.captures(uri) {
                    Ok(caps) => caps?,
                    Err(error) => {
                        tracing::warn!(pattern = %self.pattern, uri, %error, "route pattern failed to run");
                        return None;
                    }
                };
                for (index, name) in regex.capture_names().enumerate().skip(1) {
                    captures.push(name, caps.get(index).map(|m| m.as_str()));
                }
            }
            Matcher::Literal => {
                if self.pattern != uri {
                    return None;
                }
            }
        }
        Some(captures)
    }

    /// Returns true if `uri` matches the anchored pattern.
    #[must_use]
    pub fn is_match(&self, uri: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(uri),
            Matcher::Fancy(regex) => regex.is_match(uri).unwrap_or(false),
            Matcher::Literal => self.pattern == uri,
        }
    }
}

/// Insertion-ordered map from pattern to [`Route`].
///
/// # Example
///
/// ```rust
/// use daedalus_router::{RouteTable, VerbKey};
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.insert("login", VerbKey::Method(Method::POST), "postLogin");
///
/// assert!(table.resolve("login", &Method::POST).is_some());
/// assert!(table.resolve("login", &Method::GET).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: IndexMap<String, Route<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            routes: IndexMap::new(),
        }
    }
}

impl<H> RouteTable<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `pattern` under `verb`.
    ///
    /// A pattern keeps the position of its first registration. Returns the
    /// handler that was replaced, if any.
    pub fn insert(&mut self, pattern: &str, verb: VerbKey, handler: H) -> Option<H> {
        self.routes
            .entry(pattern.to_string())
            .or_insert_with(|| Route::new(pattern))
            .methods
            .set(verb, handler)
    }

    /// Registers the handler built by `make`, which sees the route it joins.
    ///
    /// Lets a caller size per-handler metadata by the pattern's capture count
    /// without compiling the pattern twice.
    pub fn insert_with<F>(&mut self, pattern: &str, verb: VerbKey, make: F) -> Option<H>
    where
        F: FnOnce(&Route<H>) -> H,
    {
        let route = self
            .routes
            .entry(pattern.to_string())
            .or_insert_with(|| Route::new(pattern));
        let handler = make(route);
        route.methods.set(verb, handler)
    }

    /// Looks up a route by its exact pattern string.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&Route<H>> {
        self.routes.get(pattern)
    }

    /// Iterates routes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.values()
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolves a relative URI and verb to a handler.
    pub fn resolve(&self, uri: &str, method: &Method) -> Option<RouteMatch<'_, H>> {
        if let Some((pattern, route)) = self.routes.get_key_value(uri) {
            if let Some(handler) = route.methods.handler(method) {
                return Some(RouteMatch::new(
                    handler,
                    Captures::new(),
                    VerbKey::Method(method.clone()),
                    pattern,
                ));
            }
            if let Some(handler) = route.methods.any_handler() {
                return Some(RouteMatch::new(handler, Captures::new(), VerbKey::Any, pattern));
            }
        }

        for route in self.routes.values() {
            let Some(captures) = route.captures(uri) else {
                continue;
            };
            let found = route
                .methods
                .handler(method)
                .map(|h| (h, VerbKey::Method(method.clone())))
                .or_else(|| route.methods.any_handler().map(|h| (h, VerbKey::Any)));
            if let Some((handler, verb)) = found {
                return Some(RouteMatch::new(handler, captures, verb, &route.pattern));
            }
        }

        None
    }

    /// Iterates the routes whose pattern matches `uri`, in insertion order.
    pub fn matching<'a>(&'a self, uri: &'a str) -> impl Iterator<Item = &'a Route<H>> + 'a {
        self.routes.values().filter(move |route| route.is_match(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get() -> VerbKey {
        VerbKey::Method(Method::GET)
    }

    #[test]
    fn test_table_new() {
        let table: RouteTable<&str> = RouteTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_exact_match() {
        let mut table = RouteTable::new();
        table.insert("test/test", get(), "test");

        let found = table.resolve("test/test", &Method::GET).unwrap();
        assert_eq!(*found.handler, "test");
        assert_eq!(found.pattern, "test/test");
        assert!(found.captures.is_empty());
        assert_eq!(found.verb, get());
    }

    #[test]
    fn test_insert_with_sees_route() {
        let mut table = RouteTable::new();
        table.insert_with(r"stats/(\d+)", get(), |route| route.capture_count());
        table.insert_with(r"stats/(\d+)", VerbKey::Any, |route| route.capture_count() + 10);

        let found = table.resolve("stats/3", &Method::GET).unwrap();
        assert_eq!(*found.handler, 1);
        let found = table.resolve("stats/3", &Method::POST).unwrap();
        assert_eq!(*found.handler, 11);
    }

    #[test]
    fn test_exact_verb_beats_wildcard() {
        let mut table = RouteTable::new();
        table.insert("test", VerbKey::Any, "allTest");
        table.insert("test", get(), "getTest");

        assert_eq!(*table.resolve("test", &Method::GET).unwrap().handler, "getTest");
        let other = table.resolve("test", &Method::PUT).unwrap();
        assert_eq!(*other.handler, "allTest");
        assert!(other.is_wildcard());
    }

    #[test]
    fn test_missing_verb_is_not_found() {
        let mut table = RouteTable::new();
        table.insert("login", VerbKey::Method(Method::POST), "postLogin");
        assert!(table.resolve("login", &Method::GET).is_none());
    }

    #[test]
    fn test_regex_captures() {
        let mut table = RouteTable::new();
        table.insert(r"user/(\d+)/(\w+)", get(), "user");

        let found = table.resolve("user/42/posts", &Method::GET).unwrap();
        assert_eq!(found.captures.len(), 2);
        assert_eq!(found.captures.get(0), Some("42"));
        assert_eq!(found.captures.get(1), Some("posts"));
    }

    #[test]
    fn test_regex_is_anchored() {
        let mut table = RouteTable::new();
        table.insert(r"user/\d+", get(), "user");
        assert!(table.resolve("user/42x", &Method::GET).is_none());
        assert!(table.resolve("api/user/42", &Method::GET).is_none());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let mut table = RouteTable::new();
        table.insert("a|b", get(), "ab");
        assert!(table.resolve("b", &Method::GET).is_some());
        assert!(table.resolve("ab", &Method::GET).is_none());
    }

    #[test]
    fn test_non_capturing_groups_are_not_captures() {
        let mut table = RouteTable::new();
        table.insert(r"(?:v1|v2)/item/(\d+)", get(), "item");

        let found = table.resolve("v2/item/7", &Method::GET).unwrap();
        assert_eq!(found.captures.len(), 1);
        assert_eq!(found.captures.get(0), Some("7"));
        assert_eq!(table.get(r"(?:v1|v2)/item/(\d+)").unwrap().capture_count(), 1);
    }

    #[test]
    fn test_named_groups() {
        let mut table = RouteTable::new();
        table.insert(r"post/(?P<slug>[a-z-]+)", get(), "post");

        let found = table.resolve("post/hello-world", &Method::GET).unwrap();
        assert_eq!(found.captures.by_name("slug"), Some("hello-world"));
    }

    #[test]
    fn test_first_registered_regex_wins() {
        let mut table = RouteTable::new();
        table.insert(r"item/(\d+)", get(), "numeric");
        table.insert(r"item/(.+)", get(), "any");

        assert_eq!(*table.resolve("item/5", &Method::GET).unwrap().handler, "numeric");
        assert_eq!(*table.resolve("item/x", &Method::GET).unwrap().handler, "any");
    }

    #[test]
    fn test_regex_skips_route_without_verb() {
        let mut table = RouteTable::new();
        table.insert(r"item/(\d+)", VerbKey::Method(Method::POST), "create");
        table.insert(r"item/(.+)", get(), "read");

        let found = table.resolve("item/5", &Method::GET).unwrap();
        assert_eq!(*found.handler, "read");
    }

    #[test]
    fn test_regex_falls_back_to_wildcard() {
        let mut table = RouteTable::new();
        table.insert(r"item/(\d+)", VerbKey::Any, "any");

        let found = table.resolve("item/5", &Method::PATCH).unwrap();
        assert_eq!(*found.handler, "any");
        assert_eq!(found.verb, VerbKey::Any);
        assert_eq!(found.captures.get(0), Some("5"));
    }

    #[test]
    fn test_negative_lookahead() {
        let mut table = RouteTable::new();
        table.insert(r"page/(?!admin)(\w+)", get(), "page");

        let route = table.get(r"page/(?!admin)(\w+)").unwrap();
        assert!(!route.is_literal());
        assert_eq!(route.capture_count(), 1);

        let found = table.resolve("page/home", &Method::GET).unwrap();
        assert_eq!(*found.handler, "page");
        assert_eq!(found.captures.len(), 1);
        assert_eq!(found.captures.get(0), Some("home"));
        assert!(table.resolve("page/admin", &Method::GET).is_none());
    }

    #[test]
    fn test_positive_lookahead_keeps_regex_order() {
        let mut table = RouteTable::new();
        table.insert(r"file/(?=\w+\.json$)(.+)", get(), "json");
        table.insert(r"file/(.+)", get(), "other");

        let found = table.resolve("file/a.json", &Method::GET).unwrap();
        assert_eq!(*found.handler, "json");
        assert_eq!(found.captures.get(0), Some("a.json"));
        assert_eq!(*table.resolve("file/a.xml", &Method::GET).unwrap().handler, "other");
        assert_eq!(table.matching("file/a.json").count(), 2);
    }

    #[test]
    fn test_malformed_regex_is_literal() {
        let mut table = RouteTable::new();
        table.insert("page/(unclosed", get(), "page");

        let route = table.get("page/(unclosed").unwrap();
        assert!(route.is_literal());
        assert_eq!(route.capture_count(), 0);
        assert!(table.resolve("page/unclosed", &Method::GET).is_none());
        assert!(table.resolve("page/(unclosed", &Method::GET).is_some());
    }

    #[test]
    fn test_insert_keeps_first_position() {
        let mut table = RouteTable::new();
        table.insert("a", get(), 1);
        table.insert("b", get(), 2);
        assert_eq!(table.insert("a", VerbKey::Method(Method::POST), 3), None);
        assert_eq!(table.insert("a", get(), 4), Some(1));

        let order: Vec<&str> = table.iter().map(Route::pattern).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_matching_routes() {
        let mut table = RouteTable::new();
        table.insert("stats", get(), "stats");
        table.insert(r"user/(\d+)", get(), "user");
        table.insert(r"user/.*", VerbKey::Any, "users");

        let matched: Vec<&str> = table.matching("user/1").map(Route::pattern).collect();
        assert_eq!(matched, vec![r"user/(\d+)", "user/.*"]);
    }
}
