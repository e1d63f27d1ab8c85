//! Database initialization.
//!
//! # Usage
//!
//! ```bash
//! simcard-cli init
//! ```
//!
//! Uses the same environment variables as the server (`SIMCARD_DATABASE_URL`,
//! `SIMCARD_ADMIN_USERNAME`, `SIMCARD_ADMIN_PASSWORD`).

use secrecy::ExposeSecret;
use simcard_server::{ServerConfig, db, services::AuthService};

use super::CommandError;

/// Create the database file if needed, apply the schema and seed the admin user.
pub async fn run() -> Result<(), CommandError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    db::init_schema(&pool).await?;
    tracing::info!("Schema applied");

    let seed = &config.seed_user;
    let created = AuthService::new(&pool)
        .seed_default_user(&seed.username, seed.password.expose_secret())
        .await?;

    match created {
        Some(user) => tracing::info!("Created seed user '{}'", user.username),
        None => tracing::info!("Seed user '{}' already exists", seed.username),
    }
    if seed.default_password {
        tracing::warn!("Seed user uses the built-in default password");
    }

    pool.close().await;
    Ok(())
}
