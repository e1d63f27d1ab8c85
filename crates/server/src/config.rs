//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults reproduce a local test setup.
//!
//! - `SIMCARD_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   then `sqlite://simcard_db.sqlite`)
//! - `SIMCARD_HOST` - Bind address (default: 127.0.0.1)
//! - `SIMCARD_PORT` - Listen port (default: 9022)
//! - `SIMCARD_API_TOKEN` - Opaque token handed out on login (default: `test-token-123`)
//! - `SIMCARD_ADMIN_USERNAME` - Seed user created on startup (default: `admin`)
//! - `SIMCARD_ADMIN_PASSWORD` - Seed user password (default: `admin123`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://simcard_db.sqlite";
const DEFAULT_API_TOKEN: &str = "test-token-123";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `SQLite` database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Static token returned by a successful login
    pub api_token: SecretString,
    /// User created at startup when absent
    pub seed_user: SeedUserConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Credentials of the user seeded at startup.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct SeedUserConfig {
    /// Login name
    pub username: String,
    /// Plain-text password, hashed before it is stored
    pub password: SecretString,
    /// Whether the password came from the built-in default
    pub default_password: bool,
}

impl std::fmt::Debug for SeedUserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUserConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("default_password", &self.default_password)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("SIMCARD_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = parse_or_default::<IpAddr, _>(&lookup, "SIMCARD_HOST", "127.0.0.1")?;
        let port = parse_or_default::<u16, _>(&lookup, "SIMCARD_PORT", "9022")?;
        let api_token = lookup("SIMCARD_API_TOKEN").unwrap_or_else(|| DEFAULT_API_TOKEN.to_string());
        if api_token.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SIMCARD_API_TOKEN".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let seed_user = SeedUserConfig::from_lookup(&lookup);

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            api_token: SecretString::from(api_token),
            seed_user,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_or_default(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                "0.0",
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SeedUserConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup("SIMCARD_ADMIN_USERNAME")
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());
        let (password, default_password) = lookup("SIMCARD_ADMIN_PASSWORD")
            .map_or_else(|| (DEFAULT_ADMIN_PASSWORD.to_string(), true), |p| (p, false));

        Self {
            username,
            password: SecretString::from(password),
            default_password,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or_default<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
