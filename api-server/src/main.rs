//! API Server for the task manager
//!
//! Serves the task and audit-log REST API backed by a single JSON file.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tm_core::store::JsonFileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=debug,tm_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Using data file {:?} (corrupt file policy: {})",
        config.data_file,
        config.on_corrupt.as_str()
    );

    let store = JsonFileStore::open(&config.data_file, config.on_corrupt)
        .await
        .with_context(|| format!("Failed to open store at {}", config.data_file.display()))?;

    tracing::info!("Access gate user: {}", config.credentials.username());

    let app_state = AppState::new(Arc::new(store), config.credentials.clone());
    let app = routes::app(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Task Manager API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
