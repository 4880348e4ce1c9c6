//! Error types for the DocDB repository.
//!
//! This module provides a unified error type for all search operations.

mod search_index_error;

pub use search_index_error::SearchIndexError;
