use axum::{extract::State, Json};
use serde::Serialize;

use super::{parse_id, ApiJson, ApiPath, AppState};
use crate::{
    error::Result,
    models::{AddressRequest, OnChainReceipt, TankDetails},
    responses::ApiResponse,
};

#[derive(Debug, Serialize)]
pub struct MultiplierResponse {
    pub tank_id: i64,
    pub multiplier: f64,
}

/// GET /api/tank/{id}
pub async fn get_tank(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<TankDetails>>> {
    let id = parse_id(&id, "tank")?;
    let tank = state.tanks().get_tank_by_id(id).await?;
    Ok(Json(ApiResponse::with_message(tank, "Tank retrieved successfully")))
}

/// GET /api/tank/{id}/multiplier
pub async fn get_multiplier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<MultiplierResponse>>> {
    let tank_id = parse_id(&id, "tank")?;
    let multiplier = state.tanks().get_xp_multiplier(tank_id).await?;
    Ok(Json(ApiResponse::success(MultiplierResponse {
        tank_id,
        multiplier,
    })))
}

/// POST /api/tanks/mint
pub async fn mint_tank(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddressRequest>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let receipt = state.tanks().mint_tank(&req.address).await?;
    Ok(Json(ApiResponse::with_message(receipt, "Tank mint submitted")))
}
