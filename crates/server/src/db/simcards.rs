//! Database operations for SIM cards.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use simcard_core::{ShopId, SimCardId, SimCardStatus};

use super::{RepositoryError, begin_write};
use crate::models::simcard::{CheckResult, SimCard, UpdateSimCardInput};

const SIMCARD_COLUMNS: &str = "id, code, status, assigned_to, assigned_shop_name, added_date, \
                               sale_date, last_checked";

const DUPLICATE_CODE: &str = "SimCard code already exists";

/// Internal row type for SIM card queries.
#[derive(Debug, sqlx::FromRow)]
struct SimCardRow {
    id: SimCardId,
    code: String,
    status: SimCardStatus,
    assigned_to: Option<ShopId>,
    assigned_shop_name: Option<String>,
    added_date: DateTime<Utc>,
    sale_date: Option<DateTime<Utc>>,
    last_checked: Option<DateTime<Utc>>,
}

impl From<SimCardRow> for SimCard {
    fn from(row: SimCardRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            status: row.status,
            assigned_to: row.assigned_to,
            assigned_shop_name: row.assigned_shop_name,
            added_date: row.added_date,
            sale_date: row.sale_date,
            last_checked: row.last_checked,
        }
    }
}

/// Repository for SIM card database operations.
pub struct SimCardRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SimCardRepository<'a> {
    /// Create a new SIM card repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all SIM cards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SimCard>, RepositoryError> {
        let rows: Vec<SimCardRow> = sqlx::query_as(&format!(
            "SELECT {SIMCARD_COLUMNS} FROM simcards ORDER BY added_date DESC, rowid DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a SIM card by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &SimCardId) -> Result<Option<SimCard>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        fetch_card(&mut conn, id).await
    }

    /// Register a new, unassigned card.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, code: &str) -> Result<SimCard, RepositoryError> {
        let row: SimCardRow = sqlx::query_as(&format!(
            r"
            INSERT INTO simcards (id, code, status, added_date)
            VALUES (?, ?, ?, ?)
            RETURNING {SIMCARD_COLUMNS}
            "
        ))
        .bind(SimCardId::generate())
        .bind(code)
        .bind(SimCardStatus::Available)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, DUPLICATE_CODE))?;

        Ok(row.into())
    }

    /// Apply a sparse update, writing only the fields present in `input`.
    ///
    /// Marking a card `sold` stamps `sale_date` with the current time.
    /// Marking it `available` clears the assignment. When `assigned_to` is
    /// given without `assigned_shop_name`, the shop's current name is copied.
    ///
    /// Returns `None` if the card does not exist. An empty update is a read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the result would pair a status
    /// with an inconsistent assignment or reference an unknown shop.
    /// Returns `RepositoryError::Conflict` if the new code is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &SimCardId,
        input: &UpdateSimCardInput,
    ) -> Result<Option<SimCard>, RepositoryError> {
        let mut tx = begin_write(self.pool).await?;

        let Some(existing) = fetch_card(&mut tx, id).await? else {
            return Ok(None);
        };
        if input.is_empty() {
            return Ok(Some(existing));
        }

        let status = input.status.unwrap_or(existing.status);
        let releasing = input.status == Some(SimCardStatus::Available);
        if !status.requires_shop()
            && (input.assigned_to.is_some() || input.assigned_shop_name.is_some())
        {
            return Err(RepositoryError::Invalid(
                "an available simcard cannot be assigned to a shop".to_owned(),
            ));
        }

        let assigned_to = if releasing {
            None
        } else {
            input.assigned_to.as_ref().or(existing.assigned_to.as_ref())
        };
        if status.requires_shop() && assigned_to.is_none() {
            return Err(RepositoryError::Invalid(format!(
                "a simcard with status '{status}' needs assignedTo"
            )));
        }

        let mut shop_name = input.assigned_shop_name.clone();
        if let Some(shop_id) = &input.assigned_to {
            let name: Option<String> = sqlx::query_scalar("SELECT name FROM shops WHERE id = ?")
                .bind(shop_id)
                .fetch_optional(&mut *tx)
                .await?;
            let Some(name) = name else {
                return Err(RepositoryError::Invalid(format!("unknown shop '{shop_id}'")));
            };
            shop_name.get_or_insert(name);
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE simcards SET ");
        {
            let mut set = query.separated(", ");
            if let Some(code) = &input.code {
                set.push("code = ").push_bind_unseparated(code.clone());
            }
            if let Some(new_status) = input.status {
                set.push("status = ").push_bind_unseparated(new_status);
                if new_status == SimCardStatus::Sold {
                    set.push("sale_date = ").push_bind_unseparated(Utc::now());
                }
            }
            if releasing {
                set.push("assigned_to = NULL");
                set.push("assigned_shop_name = NULL");
            } else {
                if let Some(shop_id) = &input.assigned_to {
                    set.push("assigned_to = ").push_bind_unseparated(shop_id.clone());
                }
                if let Some(name) = shop_name {
                    set.push("assigned_shop_name = ").push_bind_unseparated(name);
                }
            }
        }
        query
            .push(" WHERE id = ")
            .push_bind(id.clone())
            .push(" RETURNING ")
            .push(SIMCARD_COLUMNS);

        let row: SimCardRow = query
            .build_query_as::<SimCardRow>()
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_unique(e, DUPLICATE_CODE))?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    /// Delete a card. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: &SimCardId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM simcards WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hand `count` available cards to a shop in one atomic claim.
    ///
    /// Cards are claimed in storage order by a single conditional `UPDATE`,
    /// so concurrent callers can never claim the same card. If fewer than
    /// `count` cards were available nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the shop does not exist.
    /// Returns `RepositoryError::InsufficientStock` if fewer than `count` cards are available.
    /// Returns `RepositoryError::Invalid` if `count` is negative.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn assign(&self, shop_id: &ShopId, count: i64) -> Result<Vec<SimCard>, RepositoryError> {
        if count < 0 {
            return Err(RepositoryError::Invalid(
                "count must not be negative".to_owned(),
            ));
        }

        let mut tx = begin_write(self.pool).await?;

        let shop_name: Option<String> = sqlx::query_scalar("SELECT name FROM shops WHERE id = ?")
            .bind(shop_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(shop_name) = shop_name else {
            return Err(RepositoryError::NotFound);
        };

        let rows: Vec<SimCardRow> = sqlx::query_as(&format!(
            r"
            UPDATE simcards
            SET status = ?, assigned_to = ?, assigned_shop_name = ?
            WHERE id IN (
                SELECT id FROM simcards
                WHERE status = ?
                ORDER BY rowid ASC
                LIMIT ?
            )
            RETURNING {SIMCARD_COLUMNS}
            "
        ))
        .bind(SimCardStatus::Assigned)
        .bind(shop_id)
        .bind(&shop_name)
        .bind(SimCardStatus::Available)
        .bind(count)
        .fetch_all(&mut *tx)
        .await?;

        let claimed = rows.len();
        if i64::try_from(claimed).unwrap_or(i64::MAX) < count {
            tx.rollback().await?;
            return Err(RepositoryError::InsufficientStock(claimed));
        }

        tx.commit().await?;

        tracing::info!(shop_id = %shop_id, count = claimed, "SimCards assigned");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Stamp `last_checked` with the current time and return the updated card.
    ///
    /// Returns `None` if the card does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn check_status(&self, id: &SimCardId) -> Result<Option<SimCard>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        stamp_checked(&mut conn, id, Utc::now()).await
    }

    /// Stamp every known card in `ids` with one shared timestamp.
    ///
    /// Unknown IDs are skipped. Results keep request order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn auto_check<'i, I>(
        &self,
        ids: I,
        checked_at: DateTime<Utc>,
    ) -> Result<Vec<CheckResult>, RepositoryError>
    where
        I: IntoIterator<Item = &'i SimCardId>,
    {
        let mut tx = begin_write(self.pool).await?;
        let mut results = Vec::new();

        for id in ids {
            if let Some(card) = stamp_checked(&mut tx, id, checked_at).await? {
                results.push(CheckResult::new(card, checked_at));
            }
        }

        tx.commit().await?;
        Ok(results)
    }
}

async fn fetch_card(
    conn: &mut SqliteConnection,
    id: &SimCardId,
) -> Result<Option<SimCard>, RepositoryError> {
    let row: Option<SimCardRow> = sqlx::query_as(&format!(
        "SELECT {SIMCARD_COLUMNS} FROM simcards WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}

async fn stamp_checked(
    conn: &mut SqliteConnection,
    id: &SimCardId,
    checked_at: DateTime<Utc>,
) -> Result<Option<SimCard>, RepositoryError> {
    let row: Option<SimCardRow> = sqlx::query_as(&format!(
        "UPDATE simcards SET last_checked = ? WHERE id = ? RETURNING {SIMCARD_COLUMNS}"
    ))
    .bind(checked_at)
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(Into::into))
}
