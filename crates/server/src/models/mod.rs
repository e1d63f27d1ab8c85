//! Domain models for the SimCard inventory service.
//!
//! Models serialize with camelCase field names, which is the JSON contract
//! clients rely on.

pub mod shop;
pub mod simcard;
pub mod statistics;
pub mod user;

pub use shop::{CreateShopInput, Shop, ShopStats, UpdateShopInput};
pub use simcard::{
    AssignSimCardsInput, AssignmentResult, AutoCheckInput, AutoCheckReport, CheckResult,
    CreateSimCardInput, SimCard, UpdateSimCardInput,
};
pub use statistics::{GlobalStatistics, ShopSalesStats};
pub use user::User;
