//! Shop domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simcard_core::{ShopId, ShopStatus, SimCardId};

/// A retail point of sale that SIM cards are assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Unique, immutable shop ID.
    pub id: ShopId,
    /// Display name, snapshotted onto cards at assignment time.
    pub name: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ShopStatus,
    /// Free-text grouping label used for reporting.
    pub region: String,
    /// IDs of cards currently assigned to this shop, derived from `simcards.assigned_to`.
    pub assigned_sim_cards: Vec<SimCardId>,
    /// When the shop was created.
    pub added_date: DateTime<Utc>,
}

/// Input for creating a new shop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShopInput {
    pub name: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub region: String,
}

/// Sparse update for a shop. Only fields that are present are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShopInput {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<ShopStatus>,
    pub region: Option<String>,
}

impl UpdateShopInput {
    /// True when the request carries no field to change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.owner_name.is_none()
            && self.owner_phone.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.status.is_none()
            && self.region.is_none()
    }
}

/// Card counts for a single shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopStats {
    pub shop_id: ShopId,
    pub shop_name: String,
    /// Cards held by the shop and not yet sold.
    pub assigned: i64,
    pub sold: i64,
    pub total: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_empty() {
        let input: UpdateShopInput = serde_json::from_str("{}").unwrap();
        assert!(input.is_empty());

        let input: UpdateShopInput = serde_json::from_str(r#"{"ownerPhone":"555"}"#).unwrap();
        assert!(!input.is_empty());
        assert_eq!(input.owner_phone.as_deref(), Some("555"));
    }

    #[test]
    fn test_create_input_requires_region() {
        let result = serde_json::from_str::<CreateShopInput>(
            r#"{"name":"A","ownerName":"B","ownerPhone":"1","address":"X"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_shop_serializes_camel_case() {
        let shop = Shop {
            id: ShopId::new("s-1"),
            name: "Corner".to_string(),
            owner_name: "Dana".to_string(),
            owner_phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            latitude: None,
            longitude: Some(1.5),
            status: ShopStatus::Active,
            region: "North".to_string(),
            assigned_sim_cards: vec![SimCardId::new("c-1")],
            added_date: Utc::now(),
        };

        let value = serde_json::to_value(&shop).unwrap();
        assert_eq!(value["ownerName"], "Dana");
        assert_eq!(value["status"], "active");
        assert_eq!(value["assignedSimCards"][0], "c-1");
        assert!(value["latitude"].is_null());
        assert!(value.get("addedDate").is_some());
    }
}
