//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Liveness message with version
//! GET    /health                    - Liveness probe
//! GET    /health/ready              - Readiness probe (database)
//!
//! # Auth
//! POST   /auth/login                - Exchange credentials for the API token
//! POST   /auth/logout               - No-op
//!
//! # Shops
//! GET    /shops                     - List shops, newest first
//! POST   /shops                     - Create shop
//! PUT    /shops/{id}                - Sparse update
//! DELETE /shops/{id}                - Delete and release its cards
//! GET    /shops/{id}/stats          - Card counts for one shop
//!
//! # SIM cards
//! GET    /simcards                  - List cards, newest first
//! POST   /simcards                  - Register card
//! PUT    /simcards/{id}             - Sparse update
//! DELETE /simcards/{id}             - Delete card
//! POST   /simcards/assign           - Assign N available cards to a shop
//! GET    /simcards/{id}/check-status - Stamp and return one card
//! POST   /simcards/auto-check       - Stamp a batch of cards
//!
//! # Statistics
//! GET    /statistics                - Inventory-wide aggregates
//! GET    /statistics/shops          - Per-shop sales aggregates
//! ```

pub mod auth;
pub mod health;
pub mod shops;
pub mod simcards;
pub mod statistics;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Body returned by operations that have nothing else to report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) const OK: Self = Self { success: true };
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::index).post(shops::create))
        .route("/{id}", put(shops::update).delete(shops::delete))
        .route("/{id}/stats", get(shops::stats))
}

/// Create the SIM card routes router.
pub fn simcard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(simcards::index).post(simcards::create))
        .route("/assign", post(simcards::assign))
        .route("/auto-check", post(simcards::auto_check))
        .route("/{id}", put(simcards::update).delete(simcards::delete))
        .route("/{id}/check-status", get(simcards::check_status))
}

/// Create the statistics routes router.
pub fn statistics_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(statistics::global))
        .route("/shops", get(statistics::shops))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest("/shops", shop_routes())
        .nest("/simcards", simcard_routes())
        .nest("/statistics", statistics_routes())
}
