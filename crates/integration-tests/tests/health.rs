//! Liveness, readiness and cross-cutting middleware.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use simcard_integration_tests::{
    TestContext,
    http::{Method, Request, StatusCode, header},
};

#[tokio::test]
async fn root_reports_version() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "SimCard Management API is running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_probes() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));

    let (status, _) = ctx.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn readiness_fails_without_database() {
    let ctx = TestContext::new().await;
    ctx.pool.close().await;

    let (status, _) = ctx.get("/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let ctx = TestContext::new().await;

    let response = tower::ServiceExt::oneshot(
        ctx.app.clone(),
        Request::builder()
            .uri("/health")
            .header("x-request-id", "trace-me")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me"
    );
}

#[tokio::test]
async fn cors_is_permissive() {
    let ctx = TestContext::new().await;

    let response = tower::ServiceExt::oneshot(
        ctx.app.clone(),
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/shops")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn unknown_route_is_404() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
