//! Startup and runtime errors of the server binary.

use docdb_geolocation::GeolocationError;
use docdb_repository::SearchIndexError;
use thiserror::Error;

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration or a dependency that could not be set up.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Binding or serving the listener failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The search cluster could not be reached.
    #[error("Search error: {0}")]
    Search(#[from] SearchIndexError),

    /// The geocoder could not be built.
    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
