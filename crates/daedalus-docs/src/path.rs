//! Turning route regexes into OpenAPI path templates.
//!
//! Each top-level group of a route URI is either a capture, replaced by the
//! next path parameter as `{name}`, or a non-capturing or lookaround group,
//! which is dropped. Nested groups stay inside their top-level group.

use std::ops::Range;

const DROPPED_PREFIXES: [&str; 6] = ["(?:", "(?!", "(?=", "(?<=", "(?<!", "(!"];

/// Finds the byte ranges of balanced top-level groups.
///
/// Escaped parentheses and parentheses inside `[...]` classes are not group
/// delimiters. An unclosed group is ignored.
pub(crate) fn top_level_groups(pattern: &str) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut escaped = false;
    let mut in_class = false;

    for (i, c) in pattern.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            ')' if !in_class && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    groups.push(start..i + 1);
                }
            }
            _ => {}
        }
    }
    groups
}

/// A rewritten path and the parameter names it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Templated {
    pub path: String,
    pub used: Vec<String>,
}

/// Rewrites `uri`, substituting capturing groups with `names` in order.
///
/// A capturing group with no name left is kept verbatim.
pub(crate) fn template(uri: &str, names: &[&str]) -> Templated {
    let mut path = String::with_capacity(uri.len());
    let mut used = Vec::new();
    let mut names = names.iter();
    let mut last = 0;

    for group in top_level_groups(uri) {
        path.push_str(&uri[last..group.start]);
        let text = &uri[group.clone()];
        if !DROPPED_PREFIXES.iter().any(|p| text.starts_with(p)) {
            match names.next() {
                Some(name) => {
                    path.push('{');
                    path.push_str(name);
                    path.push('}');
                    used.push((*name).to_string());
                }
                None => path.push_str(text),
            }
        }
        last = group.end;
    }
    path.push_str(&uri[last..]);

    Templated { path, used }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_groups() {
        let pattern = r"a/(\d+)/b/((x|y)z)";
        let groups: Vec<&str> = top_level_groups(pattern).into_iter().map(|r| &pattern[r]).collect();
        assert_eq!(groups, vec![r"(\d+)", "((x|y)z)"]);
    }

    #[test]
    fn test_escaped_and_class_parens() {
        let pattern = r"a\(b\)/([()]+)";
        let groups: Vec<&str> = top_level_groups(pattern).into_iter().map(|r| &pattern[r]).collect();
        assert_eq!(groups, vec!["([()]+)"]);
    }

    #[test]
    fn test_unclosed_group() {
        assert!(top_level_groups("a/(b").is_empty());
    }

    #[test]
    fn test_template_substitutes_in_order() {
        let templated = template(r"/v1/user/(\d+)/post/(\w+)", &["id", "slug"]);
        assert_eq!(templated.path, "/v1/user/{id}/post/{slug}");
        assert_eq!(templated.used, vec!["id", "slug"]);
    }

    #[test]
    fn test_template_drops_non_capturing() {
        let templated = template(r"/files(?:\.json)?/(\d+)", &["id"]);
        assert_eq!(templated.path, "/files?/{id}");
        assert_eq!(templated.used, vec!["id"]);
    }

    #[test]
    fn test_template_without_names() {
        let templated = template(r"/a/(\d+)", &[]);
        assert_eq!(templated.path, r"/a/(\d+)");
        assert!(templated.used.is_empty());
    }
}
