//! User repository for database operations.
//!
//! Password hashes are read only by [`UserRepository::get_with_password_hash`]
//! and never end up on a [`User`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use simcard_core::{UserId, UserRole};

use super::RepositoryError;
use crate::models::user::User;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user and their password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserWithHashRow> = sqlx::query_as(
            r"
            SELECT id, username, role, created_at, password_hash
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.user.into(), r.password_hash)))
    }

    /// Check whether a username is taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users (id, username, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, username, role, created_at
            ",
        )
        .bind(UserId::generate())
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "username already exists"))?;

        Ok(row.into())
    }
}
