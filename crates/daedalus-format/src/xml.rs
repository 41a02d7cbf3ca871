//! XML output.
//!
//! Objects and arrays become nested elements, two spaces of indentation per
//! level. Array items, and object keys that read as numbers, are named after
//! their parent with an `-item` suffix. Leaf values are escaped and written
//! inline. The whole document is wrapped in a `<response>` root.

use serde_json::Value;

use crate::{is_numeric_key, scalar_text};

const XML_HEADER: &str = "<?xml version=\"1.0\"?>\n";

/// Renders `value` as an XML document.
///
/// ```
/// use daedalus_format::xml::to_xml;
/// use serde_json::json;
///
/// assert_eq!(
///     to_xml(&json!({"status": 200, "data": "test"})),
///     "<?xml version=\"1.0\"?>\n<response>\n  <status>200</status>\n  <data>test</data>\n</response>\n"
/// );
/// ```
#[must_use]
pub fn to_xml(value: &Value) -> String {
    let mut out = String::from(XML_HEADER);
    out.push_str("<response>\n");
    write_value(&mut out, value, "", 1);
    out.push_str("</response>\n");
    out
}

fn write_value(out: &mut String, value: &Value, parent: &str, depth: usize) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let tag = if is_numeric_key(key) {
                    item_tag(parent)
                } else {
                    key.clone()
                };
                write_element(out, &tag, child, depth);
            }
        }
        Value::Array(items) => {
            let tag = item_tag(parent);
            for child in items {
                write_element(out, &tag, child, depth);
            }
        }
        scalar => out.push_str(&escape(&scalar_text(scalar))),
    }
}

fn write_element(out: &mut String, tag: &str, value: &Value, depth: usize) {
    let name = escape(tag);
    out.push_str(&"  ".repeat(depth));
    out.push('<');
    out.push_str(&name);
    out.push('>');
    write_value(out, value, tag, depth + 1);
    out.push_str("</");
    out.push_str(&name);
    out.push_str(">\n");
}

fn item_tag(parent: &str) -> String {
    format!("{parent}-item")
}

/// Escapes the five XML special characters.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}
