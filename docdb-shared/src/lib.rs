//! # DocDB Shared
//!
//! This crate defines the data structures shared across the DocDB workspace:
//! the JSON frames exchanged over the search socket, the search query handed
//! to the search delegate, the rows it returns and the GPS coordinates used by
//! the geolocation extractor.

pub mod types;

pub use types::coordinates::Coordinates;
pub use types::frame::{ClientRequest, FrameError, ServerFrame};
pub use types::search_query::SearchQuery;
pub use types::search_result::{escape_html, render_rows, SearchRow};
