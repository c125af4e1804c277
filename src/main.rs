/// Docflow: lightweight document management core
///
/// Main entry point for the Docflow server. Initializes configuration and
/// starts the HTTP server.

use docflow::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Folder/document/workflow/notification/user APIs at /api/*
/// - Snapshot and UI state at /api/state
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004, overridable via env)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
