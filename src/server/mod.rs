// src/server/mod.rs

//! HTTP control surface.
//!
//! Exposes pipeline start/status and read-only access to the persisted
//! datasets. Status reads never block on an in-flight run.

mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::{Pipeline, StatusCell};
use crate::storage::LocalStore;

pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub status: Arc<StatusCell>,
    pub store: LocalStore,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/pipeline/run", post(handlers::run_pipeline))
        .route("/pipeline/status", get(handlers::pipeline_status))
        .route("/data/leads", get(handlers::data_leads))
        .route("/data/forecast", get(handlers::data_forecast))
        .route("/data/replies", get(handlers::data_replies))
        // The dashboard is served from another origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the control API until the process exits.
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    log::info!("Control API listening on {}", address);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
