//! Database operations for the SimCard inventory `SQLite` store.
//!
//! ## Tables
//!
//! - `shops` - Retail points of sale
//! - `simcards` - Physical SIM cards and their assignment/sale state
//! - `users` - API login accounts (Argon2id password hashes)
//!
//! # Schema
//!
//! The schema in `schema.sql` is idempotent and applied by [`init_schema`] on
//! server startup and by `simcard-cli init`.

pub mod shops;
pub mod simcards;
pub mod statistics;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::{Sqlite, SqlitePool, Transaction};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use shops::ShopRepository;
pub use simcards::SimCardRepository;
pub use statistics::StatisticsRepository;
pub use users::UserRepository;

const SCHEMA: &str = include_str!("schema.sql");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique code).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The requested change would break an invariant.
    #[error("invalid change: {0}")]
    Invalid(String),

    /// Fewer available SIM cards than requested.
    #[error("only {0} simcards available")]
    InsufficientStock(usize),
}

impl RepositoryError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_unique(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// In-memory databases (`sqlite::memory:`) live only as long as their
/// connection, so they get a single connection that is never recycled.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    if is_in_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options.journal_mode(SqliteJournalMode::Wal))
            .await
    }
}

/// Apply the idempotent schema.
///
/// # Errors
///
/// Returns `sqlx::Error` if any statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Open a transaction that holds the write lock from its first statement.
///
/// A deferred `BEGIN` that reads before writing cannot upgrade its snapshot
/// once another connection has committed, and `SQLite` fails it with
/// `SQLITE_BUSY` without honouring the busy timeout. `BEGIN IMMEDIATE` waits.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
