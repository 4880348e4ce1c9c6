//! Server settings read from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use docdb_geolocation::{GeocoderSource, DEFAULT_TIMEOUT};
use docdb_repository::opensearch::IndexConfig;
use docdb_repository::SearchServiceConfig;
use docdb_shared::types::search_query::DEFAULT_LIMIT;
use tracing::warn;

/// Default bind address.
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default HTTP port.
const DEFAULT_PORT: u16 = 9000;

/// Default directory uploaded files are stored in.
const DEFAULT_STORAGE_DIR: &str = "files";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default index searched by socket sessions.
const DEFAULT_SEARCH_INDEX: &str = "twitter";

/// Default document type searched by socket sessions.
const DEFAULT_SEARCH_TYPE: &str = "tweet";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default reverse geocoding endpoint.
const DEFAULT_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at the configured interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory uploaded files are written to and served from.
    pub storage_dir: PathBuf,
    /// Request body limit for uploads; `None` disables the limit.
    pub max_upload_bytes: Option<usize>,
    pub opensearch_url: String,
    /// Index searched by every socket session.
    pub search_index: String,
    /// Document type searched by every socket session.
    pub search_type: String,
    pub index_config: IndexConfig,
    /// Rows requested per search, clamped to the query cap.
    pub search_result_limit: usize,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub geocoding_url: String,
    pub geocoding_api_key: Option<String>,
    pub geocoding_timeout: Duration,
}

impl ServerConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DOCDB_HOST`: Bind address (default: 127.0.0.1)
    /// - `DOCDB_PORT`: HTTP port (default: 9000)
    /// - `DOCDB_STORAGE_DIR`: Upload directory (default: files)
    /// - `DOCDB_MAX_UPLOAD_BYTES`: Upload size limit (default: unlimited)
    /// - `OPENSEARCH_URL`: Cluster URL (default: http://localhost:9200)
    /// - `SEARCH_INDEX` / `SEARCH_TYPE`: Searched index and type (default: twitter / tweet)
    /// - `SEARCH_TITLE_FIELD` / `SEARCH_SNIPPET_FIELD` / `SEARCH_TYPE_FIELD`: Document fields
    ///   (default: user / message / type)
    /// - `SEARCH_RESULT_LIMIT`: Rows per search, 1 to 100 (default: 20)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `GEOCODING_URL`: Reverse geocoding endpoint (default: Google geocoding API)
    /// - `GEOCODING_API_KEY`: Geocoding API key (default: none)
    /// - `GEOCODING_TIMEOUT_SECS`: Geocoding request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let index_config = IndexConfig::new(
            string_or("SEARCH_TITLE_FIELD", docdb_repository::opensearch::DEFAULT_TITLE_FIELD),
            string_or(
                "SEARCH_SNIPPET_FIELD",
                docdb_repository::opensearch::DEFAULT_SNIPPET_FIELD,
            ),
            string_or("SEARCH_TYPE_FIELD", docdb_repository::opensearch::DEFAULT_TYPE_FIELD),
        );

        Self {
            host: parse_or(&lookup, "DOCDB_HOST", DEFAULT_HOST),
            port: parse_or(&lookup, "DOCDB_PORT", DEFAULT_PORT),
            storage_dir: PathBuf::from(string_or("DOCDB_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            max_upload_bytes: parse_optional(&lookup, "DOCDB_MAX_UPLOAD_BYTES"),
            opensearch_url: string_or("OPENSEARCH_URL", DEFAULT_OPENSEARCH_URL),
            search_index: string_or("SEARCH_INDEX", DEFAULT_SEARCH_INDEX),
            search_type: lookup("SEARCH_TYPE").unwrap_or_else(|| DEFAULT_SEARCH_TYPE.to_string()),
            index_config,
            search_result_limit: parse_or(&lookup, "SEARCH_RESULT_LIMIT", DEFAULT_LIMIT),
            connection_mode: ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE")),
            retry_interval: Duration::from_secs(parse_or(
                &lookup,
                "OPENSEARCH_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
            geocoding_url: string_or("GEOCODING_URL", DEFAULT_GEOCODING_URL),
            geocoding_api_key: lookup("GEOCODING_API_KEY").filter(|k| !k.is_empty()),
            geocoding_timeout: parse_optional(&lookup, "GEOCODING_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    /// The address the HTTP server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Search settings shared by every socket session.
    pub fn search_service_config(&self) -> SearchServiceConfig {
        SearchServiceConfig::with_result_limit(self.search_result_limit)
    }

    /// The geocoder backing the geolocation extractor.
    pub fn geocoder_source(&self) -> GeocoderSource {
        GeocoderSource::Live {
            base_url: self.geocoding_url.clone(),
            api_key: self.geocoding_api_key.clone(),
            timeout: self.geocoding_timeout,
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    parse_optional(lookup, key).unwrap_or(default)
}

fn parse_optional<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = %key, value = %raw, "Invalid value, using default");
            None
        }
    }
}
