//! Error types for the DocDB server.

mod server_error;
mod storage_error;

pub use server_error::ServerError;
pub use storage_error::StorageError;
