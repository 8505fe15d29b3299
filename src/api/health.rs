use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::AppState;
use crate::constants::API_VERSION;
use crate::responses::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub database: String,
}

/// GET /health and GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = if state.store.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: API_VERSION.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: database.to_string(),
    }))
}
