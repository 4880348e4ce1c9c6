//! # DocDB Server
//!
//! Web front end of DocDB: a landing page with an upload form, downloads of
//! stored files, and a websocket over which the browser runs full-text
//! searches against an OpenSearch cluster and resolves its own position to a
//! place name.

pub mod config;
pub mod errors;
pub mod server;
pub mod session;
pub mod storage;

pub use config::{ConnectionMode, Dependencies, ServerConfig};
pub use errors::{ServerError, StorageError};
pub use server::{create_app, run_server, AppState};
pub use session::{SearchTarget, Session};
pub use storage::FileStore;
