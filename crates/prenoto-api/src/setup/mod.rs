//! Application setup and initialization
//!
//! All initialization logic extracted from main.rs for better organization
//! and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use prenoto_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Build state (repositories and services)
    let state = Arc::new(AppState::build(pool, config.clone()));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
