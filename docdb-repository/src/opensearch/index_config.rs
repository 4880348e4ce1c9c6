//! OpenSearch index configuration and query construction.
//!
//! This module names the document fields a search reads and builds the
//! query body sent to the `_search` endpoint.

use docdb_shared::SearchQuery;
use serde_json::{json, Value};

/// Default field shown as the row title.
pub const DEFAULT_TITLE_FIELD: &str = "user";

/// Default field shown as the row snippet.
pub const DEFAULT_SNIPPET_FIELD: &str = "message";

/// Default keyword field holding the document type.
pub const DEFAULT_TYPE_FIELD: &str = "type";

/// Which document fields a search reads.
///
/// Clusters no longer support mapping types, so the document type a query
/// asks for is matched against an ordinary keyword field instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Field rendered as the first column of each row.
    pub title_field: String,
    /// Field rendered as the second column of each row.
    pub snippet_field: String,
    /// Keyword field filtered on when a query names a document type.
    pub type_field: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_FIELD, DEFAULT_SNIPPET_FIELD, DEFAULT_TYPE_FIELD)
    }
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `title_field` - Field used as the row title
    /// * `snippet_field` - Field used as the row snippet
    /// * `type_field` - Keyword field holding the document type
    pub fn new(
        title_field: impl Into<String>,
        snippet_field: impl Into<String>,
        type_field: impl Into<String>,
    ) -> Self {
        Self {
            title_field: title_field.into(),
            snippet_field: snippet_field.into(),
            type_field: type_field.into(),
        }
    }
}

/// Build the `_search` request body for a query.
///
/// The pattern is matched with `simple_query_string`, which never rejects user
/// input for bad syntax, over the title and snippet fields. A document type
/// adds a `term` filter on the type field.
pub fn build_search_body(query: &SearchQuery, config: &IndexConfig) -> Value {
    let mut bool_query = json!({
        "must": [{
            "simple_query_string": {
                "query": query.pattern,
                "fields": [config.title_field, config.snippet_field],
                "default_operator": "and"
            }
        }]
    });

    if let Some(doc_type) = &query.doc_type {
        let mut term = serde_json::Map::new();
        term.insert(config.type_field.clone(), json!(doc_type));
        bool_query["filter"] = json!([{ "term": term }]);
    }

    json!({
        "size": query.limit,
        "_source": [config.title_field, config.snippet_field],
        "query": { "bool": bool_query }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields() {
        let config = IndexConfig::default();
        assert_eq!(config.title_field, "user");
        assert_eq!(config.snippet_field, "message");
        assert_eq!(config.type_field, "type");
    }

    #[test]
    fn test_search_body_structure() {
        let query = SearchQuery::new("trying out", "twitter", "tweet");
        let body = build_search_body(&query, &IndexConfig::default());

        assert_eq!(body["size"], 20);
        assert_eq!(body["_source"], json!(["user", "message"]));

        let must = &body["query"]["bool"]["must"][0]["simple_query_string"];
        assert_eq!(must["query"], "trying out");
        assert_eq!(must["fields"], json!(["user", "message"]));

        assert_eq!(
            body["query"]["bool"]["filter"][0]["term"]["type"],
            "tweet"
        );
    }

    #[test]
    fn test_search_body_without_type_has_no_filter() {
        let query = SearchQuery::new("trying out", "twitter", "");
        let body = build_search_body(&query, &IndexConfig::default());

        assert!(body["query"]["bool"].get("filter").is_none());
    }

    #[test]
    fn test_search_body_uses_configured_fields() {
        let config = IndexConfig::new("title", "content", "kind");
        let query = SearchQuery::new("q", "docs", "pdf").with_limit(5);
        let body = build_search_body(&query, &config);

        assert_eq!(body["size"], 5);
        assert_eq!(body["_source"], json!(["title", "content"]));
        assert_eq!(body["query"]["bool"]["filter"][0]["term"]["kind"], "pdf");
    }
}
