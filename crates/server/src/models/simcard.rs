//! SIM card domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simcard_core::{ShopId, SimCardId, SimCardStatus};

/// A physical SIM card tracked through `available` -> `assigned` -> `sold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimCard {
    /// Unique SIM card ID.
    pub id: SimCardId,
    /// Printed card code, unique across all cards.
    pub code: String,
    pub status: SimCardStatus,
    /// Shop holding the card; `None` exactly when the card is available.
    pub assigned_to: Option<ShopId>,
    /// Shop name as it was when the card was assigned.
    pub assigned_shop_name: Option<String>,
    pub added_date: DateTime<Utc>,
    /// Set each time the card is marked sold.
    pub sale_date: Option<DateTime<Utc>>,
    /// Set by status checks.
    pub last_checked: Option<DateTime<Utc>>,
}

/// Input for registering a new SIM card.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSimCardInput {
    pub code: String,
}

/// Sparse update for a SIM card. Only fields that are present are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSimCardInput {
    pub code: Option<String>,
    /// Setting `sold` stamps the sale date; setting `available` clears the assignment.
    pub status: Option<SimCardStatus>,
    pub assigned_to: Option<ShopId>,
    pub assigned_shop_name: Option<String>,
}

impl UpdateSimCardInput {
    /// True when the request carries no field to change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
            && self.assigned_shop_name.is_none()
    }
}

/// Request to hand `count` available cards to a shop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSimCardsInput {
    pub shop_id: ShopId,
    pub count: i64,
}

/// Outcome of a successful bulk assignment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResult {
    pub success: bool,
    pub shop_id: ShopId,
    pub count: i64,
    pub assigned_cards: Vec<SimCard>,
}

/// Batch status-check request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCheckInput {
    #[serde(default)]
    pub sim_cards: Vec<SimCardRef>,
}

/// Reference to a card in a batch request. Entries without an `id` are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimCardRef {
    #[serde(default)]
    pub id: Option<SimCardId>,
}

impl AutoCheckInput {
    /// IDs to check, in request order.
    pub fn ids(&self) -> impl Iterator<Item = &SimCardId> {
        self.sim_cards.iter().filter_map(|r| r.id.as_ref())
    }
}

/// Per-card result of a batch status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub sim_card_id: SimCardId,
    pub status: SimCardStatus,
    pub is_sold: bool,
    pub sale_date: Option<DateTime<Utc>>,
    pub last_checked: DateTime<Utc>,
}

impl CheckResult {
    /// Build a result from a card that was just stamped at `checked_at`.
    #[must_use]
    pub fn new(card: SimCard, checked_at: DateTime<Utc>) -> Self {
        Self {
            is_sold: card.status == SimCardStatus::Sold,
            sim_card_id: card.id,
            status: card.status,
            sale_date: card.sale_date,
            last_checked: checked_at,
        }
    }
}

/// Results of a batch status check, all sharing one timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct AutoCheckReport {
    pub results: Vec<CheckResult>,
    pub timestamp: DateTime<Utc>,
}
