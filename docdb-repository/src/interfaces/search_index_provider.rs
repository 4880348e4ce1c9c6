//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use docdb_shared::{SearchQuery, SearchRow};

use crate::errors::SearchIndexError;

/// Abstracts the underlying search cluster client.
///
/// One provider is constructed at startup and shared by every socket session,
/// so implementations must be safe for concurrent callers. Implementations are
/// injected into `SearchService`, which lets tests substitute a fake cluster.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check that the cluster is reachable.
    ///
    /// Called during startup before the server starts accepting connections.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the cluster answered
    /// * `Err(SearchIndexError)` - If the cluster is unreachable or unhealthy
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Run a free-text search and return one row per hit.
    ///
    /// Rows are returned in the order the cluster ranked them; no re-ranking
    /// or pagination is applied on top of the cluster's default.
    ///
    /// # Arguments
    ///
    /// * `query` - The pattern, index and optional document type to search
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchRow>)` - The matching rows, possibly empty
    /// * `Err(SearchIndexError)` - If the cluster call fails
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRow>, SearchIndexError>;
}
