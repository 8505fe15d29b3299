use axum::{extract::State, Json};

use super::{ApiJson, ApiPath, AppState};
use crate::{
    error::Result,
    models::{AddressRequest, Decoration, Fish, OnChainReceipt, Player, TankOverview},
    responses::ApiResponse,
};

/// GET /api/player/{address}
pub async fn get_player(
    State(state): State<AppState>,
    ApiPath(address): ApiPath<String>,
) -> Result<Json<ApiResponse<Player>>> {
    let player = state.players().get_player_by_address(&address).await?;
    Ok(Json(ApiResponse::with_message(player, "Player retrieved successfully")))
}

/// POST /api/player/register
pub async fn register_player(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddressRequest>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let receipt = state.players().register_player(&req.address).await?;
    Ok(Json(ApiResponse::with_message(
        receipt,
        "Player registration submitted",
    )))
}

/// GET /api/player/{address}/tanks
pub async fn get_player_tanks(
    State(state): State<AppState>,
    ApiPath(address): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<TankOverview>>>> {
    let tanks = state.tanks().get_tanks_by_owner(&address).await?;
    Ok(Json(ApiResponse::with_message(tanks, "Tanks retrieved successfully")))
}

/// GET /api/player/{address}/fish
pub async fn get_player_fish(
    State(state): State<AppState>,
    ApiPath(address): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<Fish>>>> {
    let fish = state.fish().get_fish_by_owner(&address).await?;
    Ok(Json(ApiResponse::with_message(fish, "Fish retrieved successfully")))
}

/// GET /api/player/{address}/decorations
pub async fn get_player_decorations(
    State(state): State<AppState>,
    ApiPath(address): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<Decoration>>>> {
    let decorations = state.decorations().get_decorations_by_owner(&address).await?;
    Ok(Json(ApiResponse::with_message(
        decorations,
        "Decorations retrieved successfully",
    )))
}
