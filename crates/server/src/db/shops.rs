//! Database operations for shops.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use simcard_core::{ShopId, ShopStatus, SimCardId, SimCardStatus};

use super::{RepositoryError, begin_write};
use crate::models::shop::{CreateShopInput, Shop, ShopStats, UpdateShopInput};

const SHOP_COLUMNS: &str = "id, name, owner_name, owner_phone, address, latitude, longitude, \
                            status, region, added_date";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for shop queries.
#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: ShopId,
    name: String,
    owner_name: String,
    owner_phone: String,
    address: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    status: ShopStatus,
    region: String,
    added_date: DateTime<Utc>,
}

impl ShopRow {
    fn into_shop(self, assigned_sim_cards: Vec<SimCardId>) -> Shop {
        Shop {
            id: self.id,
            name: self.name,
            owner_name: self.owner_name,
            owner_phone: self.owner_phone,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            status: self.status,
            region: self.region,
            assigned_sim_cards,
            added_date: self.added_date,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for shop database operations.
pub struct ShopRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all shops, newest first, with their assigned card IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Shop>, RepositoryError> {
        let rows: Vec<ShopRow> = sqlx::query_as(&format!(
            "SELECT {SHOP_COLUMNS} FROM shops ORDER BY added_date DESC, rowid DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let assignments: Vec<(SimCardId, ShopId)> = sqlx::query_as(
            r"
            SELECT id, assigned_to
            FROM simcards
            WHERE assigned_to IS NOT NULL
            ORDER BY added_date ASC, rowid ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_shop: HashMap<ShopId, Vec<SimCardId>> = HashMap::new();
        for (card_id, shop_id) in assignments {
            by_shop.entry(shop_id).or_default().push(card_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let cards = by_shop.remove(&row.id).unwrap_or_default();
                row.into_shop(cards)
            })
            .collect())
    }

    /// Get a shop by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: &ShopId) -> Result<Option<Shop>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_shop(&mut conn, id).await
    }

    /// Create a new shop with a fresh ID, `active` status and no cards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &CreateShopInput) -> Result<Shop, RepositoryError> {
        let row: ShopRow = sqlx::query_as(&format!(
            r"
            INSERT INTO shops (
                id, name, owner_name, owner_phone, address,
                latitude, longitude, status, region, added_date
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {SHOP_COLUMNS}
            "
        ))
        .bind(ShopId::generate())
        .bind(&input.name)
        .bind(&input.owner_name)
        .bind(&input.owner_phone)
        .bind(&input.address)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(ShopStatus::Active)
        .bind(&input.region)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(shop_id = %row.id, name = %row.name, "Shop created");
        Ok(row.into_shop(Vec::new()))
    }

    /// Apply a sparse update, writing only the fields present in `input`.
    ///
    /// Returns `None` if the shop does not exist. An empty update is a read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update(
        &self,
        id: &ShopId,
        input: &UpdateShopInput,
    ) -> Result<Option<Shop>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        if input.is_empty() {
            return fetch_shop(&mut conn, id).await;
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE shops SET ");
        {
            let mut set = query.separated(", ");
            if let Some(name) = &input.name {
                set.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(owner_name) = &input.owner_name {
                set.push("owner_name = ")
                    .push_bind_unseparated(owner_name.clone());
            }
            if let Some(owner_phone) = &input.owner_phone {
                set.push("owner_phone = ")
                    .push_bind_unseparated(owner_phone.clone());
            }
            if let Some(address) = &input.address {
                set.push("address = ").push_bind_unseparated(address.clone());
            }
            if let Some(latitude) = input.latitude {
                set.push("latitude = ").push_bind_unseparated(latitude);
            }
            if let Some(longitude) = input.longitude {
                set.push("longitude = ").push_bind_unseparated(longitude);
            }
            if let Some(status) = input.status {
                set.push("status = ").push_bind_unseparated(status);
            }
            if let Some(region) = &input.region {
                set.push("region = ").push_bind_unseparated(region.clone());
            }
        }
        query.push(" WHERE id = ").push_bind(id.clone());

        let result = query.build().execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        fetch_shop(&mut conn, id).await
    }

    /// Delete a shop and release its cards back to `available`.
    ///
    /// Both statements run in one transaction. Returns `false` if the shop
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn delete(&self, id: &ShopId) -> Result<bool, RepositoryError> {
        let mut tx = begin_write(self.pool).await?;

        let deleted = sqlx::query("DELETE FROM shops WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let released = sqlx::query(
            r"
            UPDATE simcards
            SET status = ?, assigned_to = NULL, assigned_shop_name = NULL
            WHERE assigned_to = ?
            ",
        )
        .bind(SimCardStatus::Available)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::info!(shop_id = %id, released, "Shop deleted");
        Ok(true)
    }

    /// Count the cards held by a shop, by status.
    ///
    /// Returns `None` if the shop does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self, id: &ShopId) -> Result<Option<ShopStats>, RepositoryError> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM shops WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(shop_name) = name else {
            return Ok(None);
        };

        let (assigned, sold, total): (i64, i64, i64) = sqlx::query_as(
            r"
            SELECT
                COALESCE(SUM(status = 'assigned'), 0),
                COALESCE(SUM(status = 'sold'), 0),
                COUNT(*)
            FROM simcards
            WHERE assigned_to = ?
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(Some(ShopStats {
            shop_id: id.clone(),
            shop_name,
            assigned,
            sold,
            total,
        }))
    }
}

/// Load one shop with its assigned card IDs.
async fn fetch_shop(
    conn: &mut SqliteConnection,
    id: &ShopId,
) -> Result<Option<Shop>, RepositoryError> {
    let row: Option<ShopRow> =
        sqlx::query_as(&format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let cards: Vec<SimCardId> = sqlx::query_scalar(
        "SELECT id FROM simcards WHERE assigned_to = ? ORDER BY added_date ASC, rowid ASC",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(row.into_shop(cards)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::db::SimCardRepository;
    use crate::db::test_support;
    use crate::models::simcard::UpdateSimCardInput;

    fn input(name: &str, region: &str) -> CreateShopInput {
        CreateShopInput {
            name: name.to_string(),
            owner_name: "Owner".to_string(),
            owner_phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            latitude: Some(12.5),
            longitude: None,
            region: region.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_support::pool().await;
        let repo = ShopRepository::new(&pool);

        let shop = repo.create(&input("Corner", "North")).await.unwrap();
        assert_eq!(shop.status, ShopStatus::Active);
        assert!(shop.assigned_sim_cards.is_empty());

        let loaded = repo.get(&shop.id).await.unwrap().unwrap();
        assert_eq!(loaded, shop);
        assert!(repo.get(&ShopId::new("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = test_support::pool().await;
        let repo = ShopRepository::new(&pool);

        let first = repo.create(&input("First", "North")).await.unwrap();
        let second = repo.create(&input("Second", "South")).await.unwrap();

        let shops = repo.list().await.unwrap();
        let ids: Vec<ShopId> = shops.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_sparse_update_keeps_other_fields() {
        let pool = test_support::pool().await;
        let repo = ShopRepository::new(&pool);
        let shop = repo.create(&input("Corner", "North")).await.unwrap();

        let update = UpdateShopInput {
            status: Some(ShopStatus::Inactive),
            ..Default::default()
        };
        let updated = repo.update(&shop.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.status, ShopStatus::Inactive);
        assert_eq!(updated.name, shop.name);
        assert_eq!(updated.latitude, Some(12.5));
        assert_eq!(updated.added_date, shop.added_date);

        let unchanged = repo
            .update(&shop.id, &UpdateShopInput::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged, updated);
    }

    #[tokio::test]
    async fn test_update_missing_shop() {
        let pool = test_support::pool().await;
        let repo = ShopRepository::new(&pool);
        let update = UpdateShopInput {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };

        assert!(repo.update(&ShopId::new("nope"), &update).await.unwrap().is_none());
        assert!(
            repo.update(&ShopId::new("nope"), &UpdateShopInput::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_releases_cards() {
        let pool = test_support::pool().await;
        let shops = ShopRepository::new(&pool);
        let cards = SimCardRepository::new(&pool);

        let shop = shops.create(&input("Corner", "North")).await.unwrap();
        cards.create("C1").await.unwrap();
        cards.create("C2").await.unwrap();
        let assigned = cards.assign(&shop.id, 2).await.unwrap();
        let sold = &assigned[0];
        cards
            .update(
                &sold.id,
                &UpdateSimCardInput {
                    status: Some(SimCardStatus::Sold),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(shops.delete(&shop.id).await.unwrap());
        assert!(!shops.delete(&shop.id).await.unwrap());

        for card in cards.list().await.unwrap() {
            assert_eq!(card.status, SimCardStatus::Available);
            assert!(card.assigned_to.is_none());
            assert!(card.assigned_shop_name.is_none());
        }
    }

    #[tokio::test]
    async fn test_stats_counts_by_status() {
        let pool = test_support::pool().await;
        let shops = ShopRepository::new(&pool);
        let cards = SimCardRepository::new(&pool);

        let shop = shops.create(&input("Corner", "North")).await.unwrap();
        let empty = shops.stats(&shop.id).await.unwrap().unwrap();
        assert_eq!((empty.assigned, empty.sold, empty.total), (0, 0, 0));

        cards.create("C1").await.unwrap();
        cards.create("C2").await.unwrap();
        cards.create("C3").await.unwrap();
        cards.assign(&shop.id, 2).await.unwrap();

        let stats = shops.stats(&shop.id).await.unwrap().unwrap();
        assert_eq!(stats.shop_name, "Corner");
        assert_eq!((stats.assigned, stats.sold, stats.total), (2, 0, 2));

        let reloaded = shops.get(&shop.id).await.unwrap().unwrap();
        assert_eq!(reloaded.assigned_sim_cards.len(), 2);

        assert!(shops.stats(&ShopId::new("missing")).await.unwrap().is_none());
    }
}
