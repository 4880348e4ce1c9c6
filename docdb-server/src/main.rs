//! DocDB Server Main Entry Point
//!
//! Serves uploads, downloads and the search socket.

use std::env;

use docdb_server::{create_app, run_server, Dependencies, ServerConfig, ServerError};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("docdb_server=info,docdb_repository=info,docdb_geolocation=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "docdb-server",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "docdb-server",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting DocDB server");

    let config = ServerConfig::from_env();

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = create_app(deps.state, config.max_upload_bytes);

    match run_server(app, config.bind_addr()).await {
        Ok(()) => {
            info!("DocDB server stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(e)
        }
    }
}
