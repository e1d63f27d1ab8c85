//! Reporting endpoints.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use serde_json::json;
use simcard_integration_tests::{TestContext, http::StatusCode, id_of};

#[tokio::test]
async fn empty_statistics() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalShops"], 0);
    assert_eq!(body["activeShops"], 0);
    assert_eq!(body["totalSimCards"], 0);
    assert_eq!(body["regionStats"], json!({}));

    let sales = body["salesByDate"].as_object().unwrap();
    assert_eq!(sales.len(), 7);
    assert!(sales.values().all(|count| count == 0));
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(sales.contains_key(&today));
}

#[tokio::test]
async fn global_statistics() {
    let ctx = TestContext::new().await;
    let north = ctx.create_shop("A", "North").await;
    ctx.create_shop("B", "North").await;
    let south = ctx.create_shop("C", "South").await;
    ctx.put(
        &format!("/shops/{}", id_of(&south)),
        json!({ "status": "inactive" }),
    )
    .await;

    for code in ["C1", "C2", "C3", "C4", "C5"] {
        ctx.create_card(code).await;
    }
    let (_, assigned) = ctx
        .post(
            "/simcards/assign",
            json!({ "shopId": id_of(&north), "count": 3 }),
        )
        .await;
    let sold_id = id_of(&assigned["assignedCards"][0]);
    ctx.put(&format!("/simcards/{sold_id}"), json!({ "status": "sold" }))
        .await;

    let (status, body) = ctx.get("/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalShops"], 3);
    assert_eq!(body["activeShops"], 2);
    assert_eq!(body["totalSimCards"], 5);
    assert_eq!(body["availableSimCards"], 2);
    assert_eq!(body["assignedSimCards"], 2);
    assert_eq!(body["soldSimCards"], 1);
    assert_eq!(body["regionStats"], json!({ "North": 2, "South": 1 }));

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(body["salesByDate"][today.as_str()], 1);
}

#[tokio::test]
async fn shop_sales_statistics() {
    let ctx = TestContext::new().await;
    let busy = ctx.create_shop("Busy", "North").await;
    let idle = ctx.create_shop("Idle", "North").await;
    for code in ["C1", "C2", "C3"] {
        ctx.create_card(code).await;
    }
    let (_, assigned) = ctx
        .post(
            "/simcards/assign",
            json!({ "shopId": id_of(&busy), "count": 3 }),
        )
        .await;
    let sold_id = id_of(&assigned["assignedCards"][2]);
    ctx.put(&format!("/simcards/{sold_id}"), json!({ "status": "sold" }))
        .await;

    let (status, body) = ctx.get("/statistics/shops").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            id_of(&busy): { "sold": 1, "available": 2, "total": 3 },
            id_of(&idle): { "sold": 0, "available": 0, "total": 0 },
        })
    );
}
