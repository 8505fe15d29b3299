use axum::{extract::State, Json};

use super::{parse_id, ApiJson, ApiPath, AppState};
use crate::{
    error::Result,
    models::{AddressRequest, BreedFishRequest, FeedFishRequest, Fish, FishFamilyTree, OnChainReceipt},
    responses::ApiResponse,
};

/// GET /api/fish/{id}
pub async fn get_fish(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<Fish>>> {
    let id = parse_id(&id, "fish")?;
    let fish = state.fish().get_fish_by_id(id).await?;
    Ok(Json(ApiResponse::with_message(fish, "Fish retrieved successfully")))
}

/// GET /api/fish/{id}/family-tree
pub async fn get_family_tree(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<FishFamilyTree>>> {
    let id = parse_id(&id, "fish")?;
    let tree = state.fish().get_family_tree(id).await?;
    Ok(Json(ApiResponse::with_message(
        tree,
        "Family tree retrieved successfully",
    )))
}

/// POST /api/fish/mint
pub async fn mint_fish(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddressRequest>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let receipt = state.fish().mint_fish(&req.address).await?;
    Ok(Json(ApiResponse::with_message(receipt, "Fish mint submitted")))
}

/// POST /api/fish/feed
pub async fn feed_fish(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FeedFishRequest>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let receipt = state.fish().feed_fish_batch(&req.fish_ids).await?;
    Ok(Json(ApiResponse::with_message(receipt, "Feeding submitted")))
}

/// POST /api/fish/breed
pub async fn breed_fish(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BreedFishRequest>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let receipt = state.fish().breed_fish(req.fish1_id, req.fish2_id).await?;
    Ok(Json(ApiResponse::with_message(receipt, "Breeding submitted")))
}
