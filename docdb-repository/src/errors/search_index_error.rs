//! Search index error types.
//!
//! This module defines the unified error type for all search operations,
//! covering both backend failures and rejected queries.

use thiserror::Error;

/// Unified errors from search operations.
///
/// Used by the `SearchIndexProvider` trait and `SearchService`. Sessions turn
/// these into error frames instead of dropping the connection.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., empty index name).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search cluster.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The cluster rejected or failed the query.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse the response from the search cluster.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
