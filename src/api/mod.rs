//! HTTP surface for the batch lifecycle.
//!
//! Thin mapping only: request validation and status codes live here, all
//! behavior lives in [`JobRegistry`].

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::batch::JobRegistry;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JobRegistry>,
}

/// Build the Axum router for the batch API.
pub fn batch_routes(registry: Arc<JobRegistry>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/health", get(health))
        .route("/api/content/generate-batch", post(start_batch))
        .route(
            "/api/content/generate-batch/{job_id}",
            get(get_job).delete(cancel_job),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "blogsmith"
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartBatchRequest {
    #[serde(default)]
    topic_ids: Vec<Uuid>,
    blog_config_id: Option<Uuid>,
    auto_publish: Option<bool>,
}

async fn start_batch(
    State(state): State<AppState>,
    Json(request): Json<StartBatchRequest>,
) -> impl IntoResponse {
    if request.topic_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "topicIds array required"})),
        )
            .into_response();
    }

    let job_id = state
        .registry
        .start_batch(
            request.topic_ids,
            request.blog_config_id,
            request.auto_publish.unwrap_or(false),
        )
        .await;

    (StatusCode::CREATED, Json(json!({"jobId": job_id}))).into_response()
}

async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.registry.get_job(job_id).await {
        Some(job) => Json(job).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Job not found"})),
        )
            .into_response(),
    }
}

async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    if state.registry.cancel_job(job_id).await {
        Json(json!({"success": true})).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Job not found or not running"})),
        )
            .into_response()
    }
}
