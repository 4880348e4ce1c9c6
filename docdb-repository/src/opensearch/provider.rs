//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate. The `_search` API it calls is shared with
//! Elasticsearch, so either cluster can back it.

use async_trait::async_trait;
use docdb_shared::{SearchQuery, SearchRow};
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{build_search_body, IndexConfig};
use crate::utils;

/// OpenSearch provider implementation.
///
/// Wraps a single cluster client. The underlying transport is safe to share, so
/// one provider serves every socket session concurrently.
///
/// # Example
///
/// ```ignore
/// use docdb_repository::opensearch::{IndexConfig, OpenSearchProvider};
/// use docdb_shared::SearchQuery;
///
/// let provider = OpenSearchProvider::new("http://localhost:9200", IndexConfig::default()).await?;
/// let rows = provider.search(&SearchQuery::new("trying out", "twitter", "tweet")).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The cluster URL (e.g., "http://localhost:9200")
    /// * `index_config` - Which document fields searches read
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            title_field = %index_config.title_field,
            snippet_field = %index_config.snippet_field,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Turn a `_search` response body into rows, keeping the cluster's hit order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchRow>)` - One row per hit
    /// * `Err(SearchIndexError::ParseError)` - If the body has no `hits.hits` array
    fn parse_search_rows(
        body: &Value,
        index_config: &IndexConfig,
    ) -> Result<Vec<SearchRow>, SearchIndexError> {
        let hits = body
            .get("hits")
            .and_then(|hits| hits.get("hits"))
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::parse("response has no hits.hits array"))?;

        Ok(hits
            .iter()
            .map(|hit| {
                let source = hit.get("_source").unwrap_or(&Value::Null);
                SearchRow::new(
                    utils::source_field_as_text(source, &index_config.title_field),
                    utils::source_field_as_text(source, &index_config.snippet_field),
                )
            })
            .collect())
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }

        debug!("Cluster answered ping");
        Ok(())
    }

    /// Run a `simple_query_string` search against the query's index.
    ///
    /// # Arguments
    ///
    /// * `query` - The pattern, index and optional document type to search
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchRow>)` - One row per hit, in cluster order
    /// * `Err(SearchIndexError::ConnectionError)` - If the cluster cannot be reached
    /// * `Err(SearchIndexError::QueryError)` - If the cluster answers with a non-2xx status
    /// * `Err(SearchIndexError::ParseError)` - If the response body cannot be decoded
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRow>, SearchIndexError> {
        let body = build_search_body(query, &self.index_config);

        let response = self
            .client
            .search(SearchParts::Index(&[query.index.as_str()]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let rows = Self::parse_search_rows(&body, &self.index_config)?;

        debug!(
            index = %query.index,
            pattern = %query.pattern,
            hits = rows.len(),
            "Search completed"
        );
        Ok(rows)
    }
}
