//! This module defines the core data structures used across DocDB.
//! It re-exports the socket frame types, the search query and result rows.

pub mod coordinates;
pub mod frame;
pub mod search_query;
pub mod search_result;

pub use coordinates::Coordinates;
pub use frame::{ClientRequest, FrameError, ServerFrame};
pub use search_query::SearchQuery;
pub use search_result::{escape_html, render_rows, SearchRow};
