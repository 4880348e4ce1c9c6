//! Utility functions for the DocDB repository.

use serde_json::Value;

/// Read a field from a hit's `_source` as display text.
///
/// Strings are returned as-is, missing or null fields as an empty string, and
/// any other JSON value as its compact JSON text.
///
/// # Example
///
/// ```
/// use docdb_repository::source_field_as_text;
/// use serde_json::json;
///
/// let source = json!({ "user": "kimchy", "retweets": 3 });
/// assert_eq!(source_field_as_text(&source, "user"), "kimchy");
/// assert_eq!(source_field_as_text(&source, "retweets"), "3");
/// assert_eq!(source_field_as_text(&source, "message"), "");
/// ```
pub fn source_field_as_text(source: &Value, field: &str) -> String {
    match source.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
