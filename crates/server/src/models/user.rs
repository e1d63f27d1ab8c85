//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simcard_core::{UserId, UserRole};

/// An API user. The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: UserRole,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}
