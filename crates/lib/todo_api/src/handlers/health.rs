//! Health endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::{HealthResponse, SuccessResponse, ok};

/// `GET /api/v1/health` — liveness plus the active storage backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<SuccessResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok".into(),
        version: todo_core::version().into(),
        storage: state.config.storage.to_string(),
    })
}
