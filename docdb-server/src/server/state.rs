//! Shared application state handed to every handler.

use std::sync::Arc;

use docdb_geolocation::GeolocationExtractor;
use docdb_repository::SearchService;

use crate::session::{SearchTarget, Session};
use crate::storage::FileStore;

/// Dependencies built once at startup and shared across requests and sessions.
#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
    pub search: Arc<SearchService>,
    pub geolocation: GeolocationExtractor,
    pub target: SearchTarget,
}

impl AppState {
    pub fn new(
        store: FileStore,
        search: Arc<SearchService>,
        geolocation: GeolocationExtractor,
        target: SearchTarget,
    ) -> Self {
        Self {
            store,
            search,
            geolocation,
            target,
        }
    }

    /// A fresh session for a connection identified by `identity`.
    pub fn session(&self, identity: impl Into<String>) -> Session {
        Session::new(
            identity,
            self.search.clone(),
            self.geolocation.clone(),
            self.target.clone(),
        )
    }
}
