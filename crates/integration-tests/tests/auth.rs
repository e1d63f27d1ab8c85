//! Login and logout.

use serde_json::json;
use simcard_integration_tests::{
    API_TOKEN, SEED_PASSWORD, SEED_USERNAME, TestContext, http::StatusCode,
};

#[tokio::test]
async fn login_returns_token_and_user() {
    let ctx = TestContext::new().await;
    ctx.seed_user().await;

    let (status, body) = ctx
        .post(
            "/auth/login",
            json!({ "username": SEED_USERNAME, "password": SEED_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], API_TOKEN);
    assert_eq!(body["user"]["username"], SEED_USERNAME);
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let ctx = TestContext::new().await;
    ctx.seed_user().await;

    for (username, password) in [(SEED_USERNAME, "wrong"), ("ghost", SEED_PASSWORD)] {
        let (status, body) = ctx
            .post(
                "/auth/login",
                json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
        assert_eq!(body["detail"], "Invalid credentials");
    }
}

#[tokio::test]
async fn login_requires_both_fields() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .post("/auth/login", json!({ "username": SEED_USERNAME }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
}

#[tokio::test]
async fn logout_always_succeeds() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(
        simcard_integration_tests::http::Method::POST,
        "/auth/logout",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}
