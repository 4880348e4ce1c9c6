//! HTTP server setup and routing.

pub mod handlers;
pub mod pages;
pub mod state;
pub mod websocket;

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::errors::ServerError;
pub use self::state::AppState;

/// Create the Axum application router with all routes and middleware.
///
/// `max_upload_bytes` caps request bodies; `None` lifts the limit entirely.
pub fn create_app(state: AppState, max_upload_bytes: Option<usize>) -> Router {
    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/Search/", get(handlers::index))
        .route("/Search/*pattern", get(handlers::search_page))
        .route("/assets/search.js", get(handlers::search_script))
        .route("/upload", post(handlers::upload))
        .route("/files/*path", get(handlers::download))
        .route("/ws", get(websocket::ws_handler))
        .route("/health", get(handlers::health_check))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server on the specified address until Ctrl-C.
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("- Landing page: http://{}/", addr);
    info!("- Search socket: ws://{}/ws", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
