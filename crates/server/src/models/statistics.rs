//! Aggregate reporting models.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Number of calendar days (ending today, inclusive) covered by `salesByDate`.
pub const SALES_WINDOW_DAYS: u64 = 7;

/// Inventory-wide counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatistics {
    pub total_shops: i64,
    pub active_shops: i64,
    pub total_sim_cards: i64,
    pub available_sim_cards: i64,
    pub assigned_sim_cards: i64,
    pub sold_sim_cards: i64,
    /// Shop count per region; only regions with at least one shop appear.
    pub region_stats: BTreeMap<String, i64>,
    /// Cards sold per day, keyed `YYYY-MM-DD`, zero-filled.
    pub sales_by_date: BTreeMap<String, i64>,
}

/// Card counts for one shop in the sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopSalesStats {
    pub sold: i64,
    /// Assigned to the shop and not yet sold.
    pub available: i64,
    pub total: i64,
}

/// First day of the sales window ending on `today`.
#[must_use]
pub fn sales_window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(SALES_WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Zero-filled per-day sales for the window ending on `today`.
///
/// `daily` holds `(day, count)` pairs; days outside the window are ignored.
#[must_use]
pub fn sales_by_date<I>(today: NaiveDate, daily: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = (NaiveDate, i64)>,
{
    let start = sales_window_start(today);
    let mut window: BTreeMap<String, i64> = start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| (day.format("%Y-%m-%d").to_string(), 0))
        .collect();

    for (day, count) in daily {
        if day < start || day > today {
            continue;
        }
        if let Some(slot) = window.get_mut(&day.format("%Y-%m-%d").to_string()) {
            *slot += count;
        }
    }

    window
}
