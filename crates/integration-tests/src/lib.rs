//! Integration test harness for the SimCard API.
//!
//! Each [`TestContext`] owns a fresh in-memory `SQLite` database and drives
//! the full router (middleware included) through `tower::ServiceExt::oneshot`,
//! so no socket or external service is needed.
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//! let (status, body) = ctx.get("/shops").await;
//! assert_eq!(status, StatusCode::OK);
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

use simcard_server::{AppState, ServerConfig, app, db, services::AuthService};

pub use axum::http;

/// Username of the user created by [`TestContext::seed_user`].
pub const SEED_USERNAME: &str = "admin";
/// Password of the user created by [`TestContext::seed_user`].
pub const SEED_PASSWORD: &str = "admin123";
/// Token handed out on login in tests.
pub const API_TOKEN: &str = "test-token-123";

/// A router bound to its own empty database.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Build a context over a fresh schema.
    pub async fn new() -> Self {
        let config = ServerConfig::from_lookup(|key| match key {
            "SIMCARD_DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "SIMCARD_API_TOKEN" => Some(API_TOKEN.to_string()),
            _ => None,
        })
        .expect("test configuration is valid");

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("in-memory database opens");
        db::init_schema(&pool).await.expect("schema applies");

        let app = app(AppState::new(config, pool.clone()));
        Self { app, pool }
    }

    /// Create the default admin user.
    pub async fn seed_user(&self) {
        AuthService::new(&self.pool)
            .seed_default_user(SEED_USERNAME, SEED_PASSWORD)
            .await
            .expect("seed user is created");
    }

    /// Send a request and decode the response body.
    ///
    /// Non-JSON bodies come back as a JSON string; empty bodies as `null`.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    /// Send a request with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request is well-formed");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a shop and return its JSON.
    pub async fn create_shop(&self, name: &str, region: &str) -> Value {
        let (status, body) = self
            .post(
                "/shops",
                json!({
                    "name": name,
                    "ownerName": "Owner",
                    "ownerPhone": "555-0100",
                    "address": "1 Main St",
                    "region": region,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create shop failed: {body}");
        body
    }

    /// Register a card and return its JSON.
    pub async fn create_card(&self, code: &str) -> Value {
        let (status, body) = self.post("/simcards", json!({ "code": code })).await;
        assert_eq!(status, StatusCode::OK, "create simcard failed: {body}");
        body
    }
}

/// The `id` field of a JSON object.
pub fn id_of(value: &Value) -> String {
    value["id"]
        .as_str()
        .expect("object has a string id")
        .to_string()
}
