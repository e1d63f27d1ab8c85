//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! simcard-cli user create -u clerk -p 's3cret' -r viewer
//! ```

use simcard_core::UserRole;
use simcard_server::{ServerConfig, db, services::AuthService};

use super::CommandError;

/// Create a user with the given role. The schema is applied first.
pub async fn create(username: &str, password: &str, role: &str) -> Result<(), CommandError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::init_schema(&pool).await?;

    let user = AuthService::new(&pool)
        .create_user(username, password, role)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Role: {}",
        user.id,
        user.username,
        user.role
    );

    pool.close().await;
    Ok(())
}
