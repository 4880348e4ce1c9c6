//! Dependency initialization and wiring for the server.

use std::sync::Arc;
use std::time::Duration;

use docdb_geolocation::GeolocationExtractor;
use docdb_repository::opensearch::IndexConfig;
use docdb_repository::{OpenSearchProvider, SearchIndexProvider, SearchService};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{ConnectionMode, ServerConfig};
use crate::errors::ServerError;
use crate::server::AppState;
use crate::session::SearchTarget;
use crate::storage::FileStore;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// State shared by every handler and socket session.
    pub state: AppState,
}

impl Dependencies {
    /// Initialize all dependencies from `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServerError)` - If initialization fails (the cluster is only fatal in fail-fast mode)
    pub async fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        info!(
            opensearch_url = %config.opensearch_url,
            search_index = %config.search_index,
            search_type = %config.search_type,
            search_result_limit = config.search_result_limit,
            storage_dir = %config.storage_dir.display(),
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let provider = Self::connect_to_opensearch(
            &config.opensearch_url,
            config.index_config.clone(),
            config.connection_mode,
            config.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        let store = FileStore::new(config.storage_dir.clone());
        store.ensure_root().await.map_err(|e| {
            ServerError::config(format!("Failed to create storage directory: {}", e))
        })?;

        let geocoder = config.geocoder_source().into_geocoder()?;

        let state = AppState::new(
            store,
            Arc::new(SearchService::with_config(
                Arc::new(provider),
                config.search_service_config(),
            )),
            GeolocationExtractor::new(geocoder),
            SearchTarget::new(&config.search_index, &config.search_type),
        );

        Ok(Self { state })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, ServerError> {
        loop {
            match Self::try_connect_opensearch(url, index_config.clone()).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(ServerError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Create the provider and check that the cluster answers.
    async fn try_connect_opensearch(
        url: &str,
        index_config: IndexConfig,
    ) -> Result<OpenSearchProvider, ServerError> {
        let provider = OpenSearchProvider::new(url, index_config).await?;
        provider.ping().await?;
        Ok(provider)
    }
}
