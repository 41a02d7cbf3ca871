//! Doc-block parsing.
//!
//! Handlers describe themselves with a small tag grammar:
//!
//! ```text
//! /**
//!  * Logs a user in.
//!  *
//!  * @param string $username The login name
//!  * @param string $password
//!  * @return boolean Whether the credentials matched
//!  * @url login
//!  * @url signin
//!  */
//! ```
//!
//! Free text before the first tag is the description. A line that does not
//! start a tag continues the previous one. Recognized tags are `@param`,
//! `@return`, `@url`, `@openapi-url`, `@openapi-ignore`, `@unescape` and
//! `@suppress-status-code`; anything else is kept in [`DocBlock::other`].
//!
//! [`preceding_doc_block`] is the source-scanning adapter: given source text
//! and a declaration line it returns the comment block directly above it.

use indexmap::IndexMap;

/// One `@param` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTag {
    /// Declared type, if given.
    pub ty: Option<String>,
    /// Parameter name without the `$`.
    pub name: String,
    /// Trailing description.
    pub description: Option<String>,
}

/// The `@return` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTag {
    /// Declared type.
    pub ty: String,
    /// Trailing description.
    pub description: Option<String>,
}

/// A parsed doc block.
///
/// # Example
///
/// ```
/// use daedalus_core::DocBlock;
///
/// let doc = DocBlock::parse("/**\n * Stats.\n * @param int $days\n * @url stats\n */");
/// assert_eq!(doc.description.as_deref(), Some("Stats."));
/// assert_eq!(doc.params[0].name, "days");
/// assert_eq!(doc.urls, vec!["stats"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Text before the first tag.
    pub description: Option<String>,
    /// `@param` tags in order.
    pub params: Vec<ParamTag>,
    /// The `@return` tag.
    pub returns: Option<ReturnTag>,
    /// `@url` overrides in order.
    pub urls: Vec<String>,
    /// `@openapi-url` override.
    pub openapi_url: Option<String>,
    /// `@openapi-ignore` present.
    pub openapi_ignore: bool,
    /// `@unescape true` present.
    pub unescape: bool,
    /// `@suppress-status-code` present.
    pub suppress_status_code: bool,
    /// Unrecognized tags by name.
    pub other: IndexMap<String, Vec<String>>,
}

impl DocBlock {
    /// Parses a doc block, with or without its `/** */` delimiters.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::default();
        let mut current_tag: Option<String> = None;
        let mut current_data = String::new();

        for line in body_lines(text) {
            if line.starts_with('@') {
                doc.finish(current_tag.take(), &current_data);
                current_data.clear();
                let name: String = line[1..]
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                    .collect();
                current_tag = Some(name);
            }
            if !line.is_empty() {
                if !current_data.is_empty() {
                    current_data.push(' ');
                }
                current_data.push_str(line);
            }
        }
        doc.finish(current_tag, &current_data);
        doc
    }

    fn finish(&mut self, tag: Option<String>, data: &str) {
        let Some(tag) = tag else {
            if !data.is_empty() {
                self.description = Some(data.to_string());
            }
            return;
        };
        let rest = data
            .strip_prefix('@')
            .and_then(|d| d.strip_prefix(tag.as_str()))
            .unwrap_or(data)
            .trim();

        match tag.as_str() {
            "param" => {
                if let Some(param) = parse_param(rest) {
                    self.params.push(param);
                }
            }
            "return" => {
                let (ty, description) = split_word(rest);
                self.returns = Some(ReturnTag {
                    ty: if ty.is_empty() { "mixed".to_string() } else { ty.to_string() },
                    description,
                });
            }
            "url" if !rest.is_empty() => self.urls.push(rest.to_string()),
            "openapi-url" if !rest.is_empty() => self.openapi_url = Some(rest.to_string()),
            "openapi-ignore" => self.openapi_ignore = true,
            "unescape" => self.unescape = rest.eq_ignore_ascii_case("true"),
            "suppress-status-code" => self.suppress_status_code = true,
            _ => self.other.entry(tag).or_default().push(rest.to_string()),
        }
    }

    /// Returns the `@param` tag for a parameter name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamTag> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Strips comment delimiters and leading `*` from each line.
fn body_lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text.trim();
    let text = text.strip_prefix("/**").unwrap_or(text);
    let text = text.strip_suffix("*/").unwrap_or(text);
    text.lines().map(|line| {
        let line = line.trim();
        let line = line.strip_prefix("///").unwrap_or(line);
        line.strip_prefix('*').unwrap_or(line).trim()
    })
}

fn split_word(s: &str) -> (&str, Option<String>) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => {
            let rest = rest.trim();
            (word, (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (s, None),
    }
}

/// `[type] $name [description]`
fn parse_param(rest: &str) -> Option<ParamTag> {
    let (first, tail) = split_word(rest);
    let (ty, name, description) = if let Some(name) = first.strip_prefix('$') {
        (None, name.to_string(), tail)
    } else {
        let tail = tail?;
        let (second, description) = split_word(&tail);
        let name = second.strip_prefix('$')?.to_string();
        (Some(first.to_string()), name, description)
    };
    let name: String = name
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        return None;
    }
    Some(ParamTag {
        ty: ty.filter(|t| !t.is_empty()),
        name,
        description,
    })
}

/// Finds the doc block directly above line `decl_line` (1-based) of `source`.
///
/// Blank lines and `#[...]` attributes between the block and the declaration
/// are skipped; any other code means there is no block. Both `/** */` blocks
/// (including one-line ones) and runs of `///` lines are recognized.
///
/// ```
/// use daedalus_core::doc::preceding_doc_block;
///
/// let source = "struct A;\n\n/** Says hi. */\nfn hi() {}\n";
/// assert_eq!(preceding_doc_block(source, 4).as_deref(), Some("/** Says hi. */"));
/// assert_eq!(preceding_doc_block(source, 1), None);
/// ```
#[must_use]
pub fn preceding_doc_block(source: &str, decl_line: usize) -> Option<String> {
    let before: Vec<&str> = source.lines().take(decl_line.saturating_sub(1)).collect();
    let mut collected: Vec<&str> = Vec::new();
    let mut in_block = false;
    let mut in_slashes = false;

    for line in before.iter().rev() {
        let trimmed = line.trim();
        if in_block {
            collected.push(line);
            if trimmed.contains("/*") {
                break;
            }
            continue;
        }
        if in_slashes {
            if trimmed.starts_with("///") {
                collected.push(trimmed);
                continue;
            }
            break;
        }
        if trimmed.is_empty() || trimmed.starts_with("#[") {
            continue;
        }
        if trimmed.ends_with("*/") {
            collected.push(line);
            if trimmed.starts_with("/*") {
                break;
            }
            in_block = true;
        } else if trimmed.starts_with("///") {
            collected.push(trimmed);
            in_slashes = true;
        } else {
            return None;
        }
    }

    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    Some(collected.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_DOC: &str = "/**
     * Logs a user in.
     * Checks the credentials.
     *
     * @param string $username The login
     *                         name
     * @param $password
     * @return boolean Whether they matched
     * @url login
     * @url signin
     */";

    #[test]
    fn test_description_joins_lines() {
        let doc = DocBlock::parse(LOGIN_DOC);
        assert_eq!(doc.description.as_deref(), Some("Logs a user in. Checks the credentials."));
    }

    #[test]
    fn test_params() {
        let doc = DocBlock::parse(LOGIN_DOC);
        assert_eq!(doc.params.len(), 2);
        assert_eq!(
            doc.params[0],
            ParamTag {
                ty: Some("string".to_string()),
                name: "username".to_string(),
                description: Some("The login name".to_string()),
            }
        );
        assert_eq!(doc.params[1].ty, None);
        assert_eq!(doc.param("password").unwrap().description, None);
    }

    #[test]
    fn test_return_and_urls() {
        let doc = DocBlock::parse(LOGIN_DOC);
        let returns = doc.returns.unwrap();
        assert_eq!(returns.ty, "boolean");
        assert_eq!(returns.description.as_deref(), Some("Whether they matched"));
        assert_eq!(doc.urls, vec!["login", "signin"]);
    }

    #[test]
    fn test_flags_and_unknown_tags() {
        let doc = DocBlock::parse(
            "@openapi-ignore\n@openapi-url /docs.json\n@unescape true\n@suppress-status-code\n@deprecated use v2",
        );
        assert!(doc.openapi_ignore);
        assert_eq!(doc.openapi_url.as_deref(), Some("/docs.json"));
        assert!(doc.unescape);
        assert!(doc.suppress_status_code);
        assert_eq!(doc.other["deprecated"], vec!["use v2"]);
        assert_eq!(doc.description, None);
    }

    #[test]
    fn test_param_without_dollar_is_dropped() {
        let doc = DocBlock::parse("@param string username");
        assert!(doc.params.is_empty());
    }

    #[test]
    fn test_empty_doc() {
        assert_eq!(DocBlock::parse(""), DocBlock::default());
        assert_eq!(DocBlock::parse("/** */"), DocBlock::default());
    }

    #[test]
    fn test_preceding_block() {
        let source = "impl Routes {\n    /**\n     * Stats.\n     * @param int $days\n     */\n    #[allow(unused)]\n\n    fn get_stats() {}\n}\n";
        let block = preceding_doc_block(source, 8).unwrap();
        assert!(block.starts_with("/**"));
        assert!(block.ends_with("*/"));
        let doc = DocBlock::parse(&block);
        assert_eq!(doc.description.as_deref(), Some("Stats."));
        assert_eq!(doc.params[0].ty.as_deref(), Some("int"));
    }

    #[test]
    fn test_preceding_slash_comments() {
        let source = "let x = 1;\n/// Lists users.\n/// @return array\nfn list() {}\n";
        let block = preceding_doc_block(source, 4).unwrap();
        let doc = DocBlock::parse(&block);
        assert_eq!(doc.description.as_deref(), Some("Lists users."));
        assert_eq!(doc.returns.unwrap().ty, "array");
    }

    #[test]
    fn test_preceding_code_means_no_block() {
        let source = "/** Orphan. */\nlet a = 1;\nfn f() {}\n";
        assert_eq!(preceding_doc_block(source, 3), None);
    }
}
