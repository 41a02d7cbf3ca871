//! Plain-text output: one `key: value` line per top-level entry.
//!
//! Array items and numeric keys print the value alone. Nested values are
//! written as compact JSON.

use serde_json::Value;

use crate::{is_numeric_key, scalar_text};

/// Renders `value` as text lines.
///
/// ```
/// use daedalus_format::text::to_text;
/// use serde_json::json;
///
/// assert_eq!(to_text(&json!({"status": 200, "data": "ok"})), "status: 200\ndata: ok\n");
/// ```
#[must_use]
pub fn to_text(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) => {
            for (key, entry) in map {
                if !is_numeric_key(key) {
                    out.push_str(key);
                    out.push_str(": ");
                }
                push_line(&mut out, entry);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| push_line(&mut out, item)),
        scalar => push_line(&mut out, scalar),
    }
    out
}

fn push_line(out: &mut String, value: &Value) {
    out.push_str(&scalar_text(value));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_keys_have_no_prefix() {
        assert_eq!(to_text(&json!({"0": "a", "b": "c"})), "a\nb: c\n");
    }

    #[test]
    fn test_array() {
        assert_eq!(to_text(&json!(["a", true, null])), "a\n1\n\n");
    }

    #[test]
    fn test_nested_value_is_json() {
        assert_eq!(
            to_text(&json!({"status": 200, "data": {"id": 1}})),
            "status: 200\ndata: {\"id\":1}\n"
        );
    }

    #[test]
    fn test_scalar() {
        assert_eq!(to_text(&json!("plain")), "plain\n");
    }
}
