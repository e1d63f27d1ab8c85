//! CLI command implementations.

pub mod init;
pub mod user;

use simcard_server::config::ConfigError;
use simcard_server::services::auth::AuthError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or schema error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// User management failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, viewer")]
    InvalidRole(String),
}
