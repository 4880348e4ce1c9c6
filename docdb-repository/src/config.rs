//! Configuration types for the SearchService.

use docdb_shared::types::search_query::{DEFAULT_LIMIT, MAX_LIMIT};

/// Configuration for the SearchService.
///
/// Controls how many rows a single search may return. The cluster's own
/// ordering is kept; only the page size is decided here.
#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    /// Number of rows requested for every search.
    ///
    /// Values above the query cap are clamped when the query is built.
    pub result_limit: usize,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchServiceConfig {
    /// Create a config with a custom result limit.
    ///
    /// # Arguments
    ///
    /// * `result_limit` - Number of rows requested per search, clamped to `1..=100`
    pub fn with_result_limit(result_limit: usize) -> Self {
        Self {
            result_limit: result_limit.clamp(1, MAX_LIMIT),
        }
    }
}
