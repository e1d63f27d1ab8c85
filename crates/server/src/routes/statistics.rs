//! Reporting route handlers.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use chrono::Utc;

use simcard_core::ShopId;

use crate::db::StatisticsRepository;
use crate::error::Result;
use crate::models::statistics::{GlobalStatistics, ShopSalesStats};
use crate::state::AppState;

/// Inventory-wide aggregates, with sales over the last seven UTC days.
pub async fn global(State(state): State<AppState>) -> Result<Json<GlobalStatistics>> {
    let today = Utc::now().date_naive();
    let stats = StatisticsRepository::new(state.pool()).global(today).await?;
    Ok(Json(stats))
}

/// Per-shop sales aggregates keyed by shop ID.
pub async fn shops(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<ShopId, ShopSalesStats>>> {
    let stats = StatisticsRepository::new(state.pool()).shop_sales().await?;
    Ok(Json(stats))
}
