//! Aggregate queries for reporting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use simcard_core::ShopId;

use super::RepositoryError;
use crate::models::statistics::{
    GlobalStatistics, ShopSalesStats, sales_by_date, sales_window_start,
};

/// Repository for reporting queries.
pub struct StatisticsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatisticsRepository<'a> {
    /// Create a new statistics repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inventory-wide counts, with sales bucketed over the week ending `today` (UTC).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored sale date is malformed.
    pub async fn global(&self, today: NaiveDate) -> Result<GlobalStatistics, RepositoryError> {
        let (total_shops, active_shops): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(status = 'active'), 0) FROM shops",
        )
        .fetch_one(self.pool)
        .await?;

        let (total_sim_cards, available_sim_cards, assigned_sim_cards, sold_sim_cards): (
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r"
            SELECT COUNT(*),
                   COALESCE(SUM(status = 'available'), 0),
                   COALESCE(SUM(status = 'assigned'), 0),
                   COALESCE(SUM(status = 'sold'), 0)
            FROM simcards
            ",
        )
        .fetch_one(self.pool)
        .await?;

        let regions: Vec<(String, i64)> =
            sqlx::query_as("SELECT region, COUNT(*) FROM shops GROUP BY region")
                .fetch_all(self.pool)
                .await?;

        // Timestamps are stored as RFC 3339 UTC, so the first ten characters are the day.
        let daily: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT substr(sale_date, 1, 10) AS day, COUNT(*)
            FROM simcards
            WHERE sale_date IS NOT NULL AND substr(sale_date, 1, 10) >= ?
            GROUP BY day
            ",
        )
        .bind(sales_window_start(today).format("%Y-%m-%d").to_string())
        .fetch_all(self.pool)
        .await?;

        let daily = daily
            .into_iter()
            .map(|(day, count)| {
                NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                    .map(|day| (day, count))
                    .map_err(|e| {
                        RepositoryError::DataCorruption(format!("invalid sale date '{day}': {e}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GlobalStatistics {
            total_shops,
            active_shops,
            total_sim_cards,
            available_sim_cards,
            assigned_sim_cards,
            sold_sim_cards,
            region_stats: regions.into_iter().collect(),
            sales_by_date: sales_by_date(today, daily),
        })
    }

    /// Per-shop card counts. Shops without cards appear with zeros.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn shop_sales(&self) -> Result<BTreeMap<ShopId, ShopSalesStats>, RepositoryError> {
        let rows: Vec<(ShopId, i64, i64, i64)> = sqlx::query_as(
            r"
            SELECT s.id,
                   COALESCE(SUM(c.status = 'sold'), 0),
                   COALESCE(SUM(c.status = 'assigned'), 0),
                   COUNT(c.id)
            FROM shops s
            LEFT JOIN simcards c ON c.assigned_to = s.id
            GROUP BY s.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, sold, available, total)| {
                (
                    id,
                    ShopSalesStats {
                        sold,
                        available,
                        total,
                    },
                )
            })
            .collect())
    }
}
