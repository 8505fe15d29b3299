use axum::{extract::State, Json};

use super::{parse_id, ApiJson, ApiPath, AppState};
use crate::{
    error::Result,
    models::{Decoration, MintDecorationRequest, OnChainReceipt},
    responses::ApiResponse,
};

/// GET /api/decoration/{id}
pub async fn get_decoration(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<Decoration>>> {
    let id = parse_id(&id, "decoration")?;
    let decoration = state.decorations().get_decoration_by_id(id).await?;
    Ok(Json(ApiResponse::with_message(
        decoration,
        "Decoration retrieved successfully",
    )))
}

/// POST /api/decorations/mint
pub async fn mint_decoration(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MintDecorationRequest>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let receipt = state
        .decorations()
        .mint_decoration(&req.address, &req.kind)
        .await?;
    Ok(Json(ApiResponse::with_message(receipt, "Decoration mint submitted")))
}

/// POST /api/decoration/{id}/activate
pub async fn activate_decoration(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let id = parse_id(&id, "decoration")?;
    let receipt = state.decorations().activate_decoration(id).await?;
    Ok(Json(ApiResponse::with_message(receipt, "Activation submitted")))
}

/// POST /api/decoration/{id}/deactivate
pub async fn deactivate_decoration(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<OnChainReceipt>>> {
    let id = parse_id(&id, "decoration")?;
    let receipt = state.decorations().deactivate_decoration(id).await?;
    Ok(Json(ApiResponse::with_message(receipt, "Deactivation submitted")))
}
