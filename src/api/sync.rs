use axum::{extract::State, Json};

use super::{ApiPath, AppState};
use crate::{error::Result, models::SyncQueueItem, responses::ApiResponse};

/// GET /api/sync/pending
pub async fn get_pending(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SyncQueueItem>>>> {
    let items = state.sync().get_pending().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// GET /api/sync/{tx_hash}
pub async fn get_by_tx_hash(
    State(state): State<AppState>,
    ApiPath(tx_hash): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<SyncQueueItem>>>> {
    let items = state.sync().get_by_tx_hash(&tx_hash).await?;
    Ok(Json(ApiResponse::success(items)))
}
