//! # DocDB Repository
//!
//! This crate provides the search delegate used by socket sessions. It
//! includes the error type, the provider interface, and a concrete
//! implementation backed by an OpenSearch/Elasticsearch cluster.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod utils;

pub use config::SearchServiceConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use service::SearchService;
pub use utils::source_field_as_text;
