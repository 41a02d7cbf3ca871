//! JSON output.
//!
//! Values are serialized compactly and then re-indented by
//! [`pretty_print`], a single left-to-right scan over the compact text.
//! Outside string literals:
//!
//! - `,`, `{` and `[` are followed by a newline and indentation, one level
//!   deeper after an opening bracket
//! - `}` and `]` are preceded by a newline and indentation one level
//!   shallower
//! - `:` is followed by one space
//!
//! Empty containers therefore print as `{\n    \n}`.

use serde_json::Value;

use crate::FormatResult;

const INDENT: &str = "    ";

/// Serializes `value` compactly, escaping `/` as `\/` when asked.
pub fn to_compact(value: &Value, escape_slashes: bool) -> FormatResult<String> {
    let json = serde_json::to_string(value)?;
    Ok(if escape_slashes {
        json.replace('/', "\\/")
    } else {
        json
    })
}

/// Serializes and pretty-prints `value`.
pub fn to_pretty(value: &Value, escape_slashes: bool) -> FormatResult<String> {
    to_compact(value, escape_slashes).map(|json| pretty_print(&json))
}

/// Re-indents compact JSON text.
///
/// ```
/// use daedalus_format::json::pretty_print;
///
/// assert_eq!(
///     pretty_print(r#"{"a":[1,2]}"#),
///     "{\n    \"a\": [\n        1,\n        2\n    ]\n}"
/// );
/// ```
#[must_use]
pub fn pretty_print(json: &str) -> String {
    let mut result = String::with_capacity(json.len() * 2);
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for c in json.chars() {
        if c == '"' && !escaped {
            in_quotes = !in_quotes;
        } else if (c == '}' || c == ']') && !in_quotes {
            depth = depth.saturating_sub(1);
            newline(&mut result, depth);
        }

        result.push(c);

        if !in_quotes {
            match c {
                ':' => result.push(' '),
                ',' => newline(&mut result, depth),
                '{' | '[' => {
                    depth += 1;
                    newline(&mut result, depth);
                }
                _ => {}
            }
        }

        escaped = c == '\\' && !escaped;
    }

    result
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
