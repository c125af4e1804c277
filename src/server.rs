/// Server setup and initialization
///
/// Wires together the store, workflow engine, and HTTP routes into a
/// complete Axum application.

use crate::{api, api::AppState, config::Config};
use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Builds a fresh store/engine pair and mounts the resource routers on it.
/// State is process-local and ephemeral; a restart starts empty.
pub fn create_app() -> Router {
    tracing::info!("🏗️ Creating application state (in-memory store + workflow engine)");
    let app_state = AppState::new();

    tracing::info!("📡 Creating HTTP router with all endpoints");
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Resource API routes
        .merge(api::api_routes().with_state(app_state))
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Docflow server...");

    let app = create_app();

    // Bind to the configured address
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
