//! Flatten rich-text document trees (Atlassian Document Format) to plain text.

use serde_json::Value;

/// Block nodes that end with a line break.
const BLOCK_NODES: &[&str] = &[
    "paragraph",
    "heading",
    "blockquote",
    "listItem",
    "bulletList",
    "orderedList",
];

/// Flatten a document to trimmed plain text.
///
/// Strings that parse as JSON documents are flattened; other strings are
/// returned unchanged. Null yields an empty string.
pub fn flatten(doc: &Value) -> String {
    match doc {
        Value::Null => String::new(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Object(_)) => node_text(&parsed).trim().to_string(),
            _ => s.clone(),
        },
        Value::Object(_) => node_text(doc).trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) => String::new(),
    }
}

fn node_text(node: &Value) -> String {
    let Value::Object(map) = node else {
        return String::new();
    };
    let node_type = map.get("type").and_then(Value::as_str).unwrap_or("");

    match node_type {
        "text" => return str_field(node, "text"),
        "mention" => return str_field(&node["attrs"], "text"),
        "emoji" => return str_field(&node["attrs"], "shortName"),
        "hardBreak" => return "\n".to_string(),
        _ => {}
    }

    let mut out: String = map
        .get("content")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(node_text).collect())
        .unwrap_or_default();

    if BLOCK_NODES.contains(&node_type) {
        out.push('\n');
    }
    out
}

fn str_field(node: &Value, key: &str) -> String {
    node.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_doc() -> Value {
        json!({
            "type": "doc",
            "version": 1,
            "content": [
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": "Hi " },
                        { "type": "mention", "attrs": { "id": "1", "text": "@Ada" } },
                        { "type": "text", "text": " " },
                        { "type": "emoji", "attrs": { "shortName": ":smile:" } }
                    ]
                },
                {
                    "type": "bulletList",
                    "content": [
                        { "type": "listItem", "content": [
                            { "type": "paragraph", "content": [ { "type": "text", "text": "one" } ] }
                        ] }
                    ]
                },
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": "a" },
                        { "type": "hardBreak" },
                        { "type": "text", "text": "b" }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_flatten_document() {
        assert_eq!(flatten(&sample_doc()), "Hi @Ada :smile:\none\n\n\na\nb");
    }

    #[test]
    fn test_flatten_json_string() {
        let raw = sample_doc().to_string();
        assert_eq!(flatten(&Value::String(raw)), "Hi @Ada :smile:\none\n\n\na\nb");
    }

    #[test]
    fn test_plain_string_passthrough() {
        assert_eq!(flatten(&json!("  plain text  ")), "  plain text  ");
    }

    #[test]
    fn test_null_and_unknown_nodes() {
        assert_eq!(flatten(&Value::Null), "");
        assert_eq!(flatten(&json!({ "type": "rule" })), "");
        assert_eq!(flatten(&json!({ "type": "text" })), "");
    }
}
