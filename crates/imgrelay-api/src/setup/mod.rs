//! Application setup and initialization
//!
//! All startup wiring lives here so main.rs stays a thin entry point.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use imgrelay_cloud::{CloudinaryClient, ImageHost};
use imgrelay_core::Config;
use imgrelay_storage::SpoolDir;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    let spool = SpoolDir::new(&config.upload_dir)
        .await
        .context("Failed to initialize spool directory")?;

    let host: Arc<dyn ImageHost> = Arc::new(
        CloudinaryClient::new(
            config.cloud_name.clone(),
            config.api_key.clone(),
            config.api_secret.clone(),
        )
        .context("Failed to create cloud client")?,
    );

    let state = Arc::new(AppState::new(&config, host, spool));

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
