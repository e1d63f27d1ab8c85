//! Shop route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use simcard_core::ShopId;

use super::SuccessResponse;
use crate::db::ShopRepository;
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::shop::{CreateShopInput, Shop, ShopStats, UpdateShopInput};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Shop not found".to_string())
}

/// List all shops, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Shop>>> {
    let shops = ShopRepository::new(state.pool()).list().await?;
    Ok(Json(shops))
}

/// Create a shop.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateShopInput>,
) -> Result<Json<Shop>> {
    let shop = ShopRepository::new(state.pool()).create(&input).await?;
    Ok(Json(shop))
}

/// Apply a sparse update to a shop.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
    ApiJson(input): ApiJson<UpdateShopInput>,
) -> Result<Json<Shop>> {
    ShopRepository::new(state.pool())
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Delete a shop and release its cards.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
) -> Result<Json<SuccessResponse>> {
    if ShopRepository::new(state.pool()).delete(&id).await? {
        Ok(Json(SuccessResponse::OK))
    } else {
        Err(not_found())
    }
}

/// Card counts for one shop.
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
) -> Result<Json<ShopStats>> {
    ShopRepository::new(state.pool())
        .stats(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}
