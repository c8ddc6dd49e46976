//! Raw issue-tracker comment records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Comment author as reported by the tracker API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentAuthor {
    pub account_id: String,
    pub display_name: Option<String>,
}

/// A single ticket comment.
///
/// `body` is either a rich-text document tree or a plain string; `created`
/// is a fixed-width ISO-8601 timestamp and is compared as a raw string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Comment {
    pub author: CommentAuthor,
    pub body: Value,
    pub created: String,
}

impl Comment {
    pub fn is_by(&self, account_id: &str) -> bool {
        self.author.account_id == account_id
    }

    pub fn author_name(&self) -> &str {
        self.author.display_name.as_deref().unwrap_or("Unknown")
    }
}

/// Parse a comment list from either a bare array or a `{"comments": [...]}` page.
///
/// Entries that are not comment objects are dropped; anything else yields an
/// empty list.
pub fn parse_comments(value: &Value) -> Vec<Comment> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("comments") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Comment>(item.clone()) {
            Ok(comment) => Some(comment),
            Err(e) => {
                warn!(error = %e, "dropping malformed comment entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_array() {
        let comments = parse_comments(&json!([
            {
                "author": { "accountId": "abc", "displayName": "Ada" },
                "body": "hello",
                "created": "2024-01-02T10:00:00.000+0000"
            }
        ]));
        assert_eq!(comments.len(), 1);
        assert!(comments[0].is_by("abc"));
        assert_eq!(comments[0].author_name(), "Ada");
    }

    #[test]
    fn test_parse_comment_page_object() {
        let comments = parse_comments(&json!({
            "comments": [ { "author": { "accountId": "x" }, "created": "2024" } ],
            "total": 1
        }));
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_name(), "Unknown");
        assert!(comments[0].body.is_null());
    }

    #[test]
    fn test_parse_garbage_yields_empty() {
        assert!(parse_comments(&json!("nope")).is_empty());
        assert!(parse_comments(&json!({ "items": [] })).is_empty());
        assert!(parse_comments(&json!([1, 2])).is_empty());
    }
}
