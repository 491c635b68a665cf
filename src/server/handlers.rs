// src/server/handlers.rs

//! Control API handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiError;
use super::AppState;
use crate::models::PipelineStatus;
use crate::storage::{ENRICHED_LEADS, FORECAST, REPLIES};

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub query: String,
}

/// Service banner.
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "Prospector backend running" }))
}

/// Start a pipeline run in the background.
///
/// Returns 202 immediately after the run is spawned; 409 while another
/// run is active.
pub async fn run_pipeline(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state.pipeline.start(request.query)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "started",
            "message": "Pipeline execution started in background",
        })),
    ))
}

/// Current pipeline status snapshot.
pub async fn pipeline_status(State(state): State<AppState>) -> Json<PipelineStatus> {
    Json(state.status.snapshot())
}

/// Enriched lead dataset, or an empty array before the first run.
pub async fn data_leads(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.read_rows(ENRICHED_LEADS).await?))
}

/// Forecast dataset, or an empty array before the first run.
pub async fn data_forecast(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.read_rows(FORECAST).await?))
}

/// Replies dataset, or an empty array when nothing has come back.
pub async fn data_replies(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.read_rows(REPLIES).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::Config;
    use crate::pipeline::{Pipeline, StatusCell};
    use crate::server;
    use crate::storage::LocalStore;

    /// Serve the router on an ephemeral port, returning its base URL.
    async fn spawn_server(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, server::router(state)).await.unwrap();
        });
        format!("http://{address}")
    }

    fn test_state(data_dir: &std::path::Path) -> AppState {
        let mut config = Config::default();
        config.paths.data_dir = data_dir.to_path_buf();
        let config = Arc::new(config);

        let status = Arc::new(StatusCell::new());
        let pipeline =
            Arc::new(Pipeline::new(Arc::clone(&config), Arc::clone(&status)).unwrap());
        AppState {
            pipeline,
            status,
            store: LocalStore::new(data_dir),
        }
    }

    #[tokio::test]
    async fn test_status_endpoint_serves_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_server(test_state(dir.path())).await;

        let body: Value = reqwest::get(format!("{base}/pipeline/status"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "idle");
        assert_eq!(body["message"], "Ready");
        assert_eq!(body["steps_completed"], 0);
    }

    #[tokio::test]
    async fn test_data_endpoints_empty_before_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let base = spawn_server(test_state(dir.path())).await;

        for endpoint in ["leads", "forecast", "replies"] {
            let body: Value = reqwest::get(format!("{base}/data/{endpoint}"))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(body, json!([]));
        }
    }

    #[tokio::test]
    async fn test_run_conflict_while_running() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        // Claim the status cell as an in-flight run would.
        assert!(state.status.begin_run("busy"));
        let base = spawn_server(state).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/pipeline/run"))
            .json(&json!({ "query": "anything" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["status"], 409);
    }
}
