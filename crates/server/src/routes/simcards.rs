//! SIM card route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use simcard_core::SimCardId;

use super::SuccessResponse;
use crate::db::{RepositoryError, SimCardRepository};
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::simcard::{
    AssignSimCardsInput, AssignmentResult, AutoCheckInput, AutoCheckReport, CreateSimCardInput,
    SimCard, UpdateSimCardInput,
};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("SimCard not found".to_string())
}

/// List all cards, newest first.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<SimCard>>> {
    let cards = SimCardRepository::new(state.pool()).list().await?;
    Ok(Json(cards))
}

/// Register a card.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateSimCardInput>,
) -> Result<Json<SimCard>> {
    let card = SimCardRepository::new(state.pool())
        .create(&input.code)
        .await?;
    Ok(Json(card))
}

/// Apply a sparse update to a card.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<SimCardId>,
    ApiJson(input): ApiJson<UpdateSimCardInput>,
) -> Result<Json<SimCard>> {
    SimCardRepository::new(state.pool())
        .update(&id, &input)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Delete a card.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<SimCardId>,
) -> Result<Json<SuccessResponse>> {
    if SimCardRepository::new(state.pool()).delete(&id).await? {
        Ok(Json(SuccessResponse::OK))
    } else {
        Err(not_found())
    }
}

/// Assign `count` available cards to a shop, all or nothing.
pub async fn assign(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AssignSimCardsInput>,
) -> Result<Json<AssignmentResult>> {
    let assigned_cards = SimCardRepository::new(state.pool())
        .assign(&input.shop_id, input.count)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Shop not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(AssignmentResult {
        success: true,
        shop_id: input.shop_id,
        count: input.count,
        assigned_cards,
    }))
}

/// Stamp `lastChecked` on one card and return it.
pub async fn check_status(
    State(state): State<AppState>,
    Path(id): Path<SimCardId>,
) -> Result<Json<SimCard>> {
    SimCardRepository::new(state.pool())
        .check_status(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Stamp a batch of cards with one shared timestamp.
pub async fn auto_check(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AutoCheckInput>,
) -> Result<Json<AutoCheckReport>> {
    let timestamp = Utc::now();
    let results = SimCardRepository::new(state.pool())
        .auto_check(input.ids(), timestamp)
        .await?;

    Ok(Json(AutoCheckReport { results, timestamp }))
}
