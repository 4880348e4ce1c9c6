//! Search service implementation.
//!
//! This module provides the search delegate socket sessions call. It builds a
//! query from the session's pattern and the configured index/type, validates
//! it, and hands it to a `SearchIndexProvider`.

use std::sync::Arc;

use docdb_shared::{SearchQuery, SearchRow};
use tracing::debug;

use crate::config::SearchServiceConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;

/// The search delegate shared by every socket session.
///
/// Constructed once at startup and passed to sessions behind an `Arc`. All
/// operations return `SearchIndexError`, leaving the caller to decide how a
/// failure is reported.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use docdb_repository::SearchService;
/// use docdb_repository::opensearch::{IndexConfig, OpenSearchProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OpenSearchProvider::new("http://localhost:9200", IndexConfig::default()).await?;
/// let service = SearchService::new(Arc::new(provider));
///
/// let rows = service.search("trying out", "twitter", "tweet").await?;
/// for row in rows {
///     println!("{}: {}", row.title, row.snippet);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchServiceConfig,
}

impl SearchService {
    /// Create a new SearchService with default configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - A shared implementation of `SearchIndexProvider` (e.g., `OpenSearchProvider`)
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchServiceConfig::default(),
        }
    }

    /// Create a new SearchService with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - A shared implementation of `SearchIndexProvider`
    /// * `config` - Custom configuration for the service
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: SearchServiceConfig) -> Self {
        Self { provider, config }
    }

    /// Search `index` (restricted to `doc_type` when non-empty) for `pattern`.
    ///
    /// A blank pattern matches nothing and is answered without a cluster call.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Free-text pattern typed by the user
    /// * `index` - Index name to search
    /// * `doc_type` - Document type to restrict to, or `""` for all
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchRow>)` - Rows in cluster order
    /// * `Err(SearchIndexError::ValidationError)` - If the index name is empty
    /// * `Err(SearchIndexError)` - If the cluster call fails
    pub async fn search(
        &self,
        pattern: &str,
        index: &str,
        doc_type: &str,
    ) -> Result<Vec<SearchRow>, SearchIndexError> {
        let query = SearchQuery::new(pattern, index, doc_type).with_limit(self.config.result_limit);
        query.validate().map_err(SearchIndexError::validation)?;

        if query.is_blank() {
            debug!(index = %index, "Blank pattern, skipping cluster call");
            return Ok(Vec::new());
        }

        self.provider.search(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Mock provider for testing
    struct MockProvider {
        queries: Mutex<Vec<SearchQuery>>,
        rows: Vec<SearchRow>,
        should_fail: bool,
    }

    impl MockProvider {
        fn new(rows: Vec<SearchRow>) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                rows,
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                should_fail: true,
                ..Self::new(vec![])
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn ping(&self) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRow>, SearchIndexError> {
            if self.should_fail {
                return Err(SearchIndexError::connection("Mock failure"));
            }
            self.queries.lock().await.push(query.clone());
            Ok(self.rows.clone())
        }
    }

    #[tokio::test]
    async fn test_search_delegates_to_provider() {
        let provider = Arc::new(MockProvider::new(vec![SearchRow::new("kimchy", "hello")]));
        let service = SearchService::new(provider.clone());

        let rows = service.search("hello", "twitter", "tweet").await.unwrap();

        assert_eq!(rows, vec![SearchRow::new("kimchy", "hello")]);
        let queries = provider.queries.lock().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].pattern, "hello");
        assert_eq!(queries[0].index, "twitter");
        assert_eq!(queries[0].doc_type.as_deref(), Some("tweet"));
    }

    #[tokio::test]
    async fn test_blank_pattern_skips_provider() {
        let provider = Arc::new(MockProvider::new(vec![SearchRow::new("a", "b")]));
        let service = SearchService::new(provider.clone());

        let rows = service.search("   ", "twitter", "tweet").await.unwrap();

        assert!(rows.is_empty());
        assert!(provider.queries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_index_is_rejected() {
        let service = SearchService::new(Arc::new(MockProvider::new(vec![])));

        let result = service.search("hello", "", "tweet").await;

        assert!(matches!(result, Err(SearchIndexError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let service = SearchService::new(Arc::new(MockProvider::failing()));

        let result = service.search("hello", "twitter", "tweet").await;

        assert!(matches!(result, Err(SearchIndexError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_configured_limit_is_applied() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let service = SearchService::with_config(
            provider.clone(),
            SearchServiceConfig::with_result_limit(5),
        );

        service.search("hello", "twitter", "").await.unwrap();

        let queries = provider.queries.lock().await;
        assert_eq!(queries[0].limit, 5);
        assert!(queries[0].doc_type.is_none());
    }
}
