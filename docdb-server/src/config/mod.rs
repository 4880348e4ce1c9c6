//! Configuration and dependency wiring for the DocDB server.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{ConnectionMode, ServerConfig};
