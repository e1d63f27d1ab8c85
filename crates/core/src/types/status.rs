//! Status enums for shops, SIM cards and users.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a status or role from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct StatusParseError {
    kind: &'static str,
    value: String,
}

impl StatusParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Whether a shop is currently trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ShopStatus {
    #[default]
    Active,
    Inactive,
}

impl ShopStatus {
    /// The lowercase wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShopStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(StatusParseError::new("shop status", s)),
        }
    }
}

/// Lifecycle of a physical SIM card: `available` -> `assigned` -> `sold`.
///
/// An `available` card never has an assigned shop; `assigned` and `sold`
/// cards always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum SimCardStatus {
    /// In stock, not yet handed to a shop.
    #[default]
    Available,
    /// Handed to a shop for resale.
    Assigned,
    /// Sold to an end customer by the shop.
    Sold,
}

impl SimCardStatus {
    /// The lowercase wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Assigned => "assigned",
            Self::Sold => "sold",
        }
    }

    /// Whether a card in this status must reference a shop.
    #[must_use]
    pub const fn requires_shop(self) -> bool {
        !matches!(self, Self::Available)
    }
}

impl std::fmt::Display for SimCardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SimCardStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "assigned" => Ok(Self::Assigned),
            "sold" => Ok(Self::Sold),
            _ => Err(StatusParseError::new("simcard status", s)),
        }
    }
}

/// Role of an API user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access to shops, SIM cards and statistics.
    #[default]
    Admin,
    /// Read-only access.
    Viewer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(StatusParseError::new("user role", s)),
        }
    }
}
