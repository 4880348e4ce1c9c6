//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using an OpenSearch (or Elasticsearch-compatible) cluster as the backend.

mod index_config;
mod provider;

pub use index_config::{
    build_search_body, IndexConfig, DEFAULT_SNIPPET_FIELD, DEFAULT_TITLE_FIELD, DEFAULT_TYPE_FIELD,
};
pub use provider::OpenSearchProvider;
