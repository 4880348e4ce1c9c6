//! Search query types for the search delegate.
//!
//! This module defines the query handed from a socket session to the search
//! service and on to the search cluster.

use serde::{Deserialize, Serialize};

/// Default number of hits requested from the cluster.
pub const DEFAULT_LIMIT: usize = 20;

/// Upper bound on the number of hits a single query may request.
pub const MAX_LIMIT: usize = 100;

/// Search query parameters.
///
/// A free-text pattern plus the index and document type it is run against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    /// The free-text pattern typed by the user.
    pub pattern: String,

    /// Name of the index to search.
    pub index: String,

    /// Optional document type; `None` searches every document in the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl SearchQuery {
    /// Create a new query against `index`, restricted to `doc_type` when it is non-empty.
    ///
    /// # Example
    ///
    /// ```
    /// use docdb_shared::SearchQuery;
    ///
    /// let query = SearchQuery::new("rust", "twitter", "tweet");
    /// assert_eq!(query.doc_type.as_deref(), Some("tweet"));
    /// ```
    pub fn new(pattern: impl Into<String>, index: impl Into<String>, doc_type: &str) -> Self {
        let doc_type = doc_type.trim();
        Self {
            pattern: pattern.into(),
            index: index.into(),
            doc_type: (!doc_type.is_empty()).then(|| doc_type.to_string()),
            limit: default_limit(),
        }
    }

    /// Set the limit for results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_LIMIT);
        self
    }

    /// Returns true when the pattern contains nothing to search for.
    pub fn is_blank(&self) -> bool {
        self.pattern.trim().is_empty()
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.index.trim().is_empty() {
            return Err("Index name cannot be empty".to_string());
        }

        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(format!("Limit must be between 1 and {}", MAX_LIMIT));
        }

        Ok(())
    }
}
