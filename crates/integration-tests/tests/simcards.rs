//! SIM card management, assignment and status checks.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use simcard_integration_tests::{TestContext, http::StatusCode, id_of};

fn parse_time(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

#[tokio::test]
async fn create_card_defaults() {
    let ctx = TestContext::new().await;

    let card = ctx.create_card("C1").await;
    assert_eq!(card["code"], "C1");
    assert_eq!(card["status"], "available");
    assert_eq!(card["assignedTo"], Value::Null);
    assert_eq!(card["assignedShopName"], Value::Null);
    assert_eq!(card["saleDate"], Value::Null);
    assert_eq!(card["lastChecked"], Value::Null);
    assert!(card["addedDate"].is_string());
}

#[tokio::test]
async fn ids_are_unique() {
    let ctx = TestContext::new().await;

    let mut ids = HashSet::new();
    for i in 0..5 {
        ids.insert(id_of(&ctx.create_card(&format!("C{i}")).await));
    }
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn duplicate_code_is_400() {
    let ctx = TestContext::new().await;
    ctx.create_card("C1").await;

    let (status, body) = ctx.post("/simcards", json!({ "code": "C1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "SimCard code already exists");

    let (_, cards) = ctx.get("/simcards").await;
    assert_eq!(cards.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_cards_newest_first() {
    let ctx = TestContext::new().await;
    let first = ctx.create_card("C1").await;
    let second = ctx.create_card("C2").await;

    let (status, cards) = ctx.get("/simcards").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = cards.as_array().unwrap().iter().map(id_of).collect();
    assert_eq!(ids, vec![id_of(&second), id_of(&first)]);
}

#[tokio::test]
async fn assign_scenario() {
    let ctx = TestContext::new().await;
    let shop = ctx.create_shop("Corner", "North").await;
    let shop_id = id_of(&shop);
    ctx.create_card("C1").await;
    ctx.create_card("C2").await;

    let (status, body) = ctx
        .post("/simcards/assign", json!({ "shopId": shop_id, "count": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["shopId"], shop_id.as_str());
    assert_eq!(body["count"], 2);

    let assigned = body["assignedCards"].as_array().unwrap();
    assert_eq!(assigned.len(), 2);
    for card in assigned {
        assert_eq!(card["status"], "assigned");
        assert_eq!(card["assignedTo"], shop_id.as_str());
        assert_eq!(card["assignedShopName"], "Corner");
    }

    let (_, shops) = ctx.get("/shops").await;
    let mut on_shop: Vec<String> = shops[0]["assignedSimCards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap().to_string())
        .collect();
    let mut expected: Vec<String> = assigned.iter().map(id_of).collect();
    on_shop.sort();
    expected.sort();
    assert_eq!(on_shop, expected);

    // Mark one sold
    let sold_id = id_of(&assigned[0]);
    let (status, sold) = ctx
        .put(&format!("/simcards/{sold_id}"), json!({ "status": "sold" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sold["status"], "sold");
    assert_eq!(sold["assignedTo"], shop_id.as_str());
    assert!(parse_time(&sold["saleDate"]) >= parse_time(&sold["addedDate"]));
}

#[tokio::test]
async fn assign_insufficient_stock_changes_nothing() {
    let ctx = TestContext::new().await;
    let shop = ctx.create_shop("Corner", "North").await;
    let shop_id = id_of(&shop);
    ctx.create_card("C1").await;
    ctx.create_card("C2").await;

    let (status, body) = ctx
        .post("/simcards/assign", json!({ "shopId": shop_id, "count": 5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Only 2 simcards available");

    let (_, cards) = ctx.get("/simcards").await;
    for card in cards.as_array().unwrap() {
        assert_eq!(card["status"], "available");
        assert_eq!(card["assignedTo"], Value::Null);
    }
}

#[tokio::test]
async fn assign_validation() {
    let ctx = TestContext::new().await;
    let shop = ctx.create_shop("Corner", "North").await;
    ctx.create_card("C1").await;

    let (status, body) = ctx
        .post("/simcards/assign", json!({ "shopId": "nope", "count": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Shop not found");

    let (status, _) = ctx
        .post(
            "/simcards/assign",
            json!({ "shopId": id_of(&shop), "count": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .post("/simcards/assign", json!({ "shopId": id_of(&shop), "count": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignedCards"], json!([]));
}

#[tokio::test]
async fn release_card_back_to_stock() {
    let ctx = TestContext::new().await;
    let shop = ctx.create_shop("Corner", "North").await;
    ctx.create_card("C1").await;
    let (_, body) = ctx
        .post(
            "/simcards/assign",
            json!({ "shopId": id_of(&shop), "count": 1 }),
        )
        .await;
    let card_id = id_of(&body["assignedCards"][0]);

    let (status, card) = ctx
        .put(
            &format!("/simcards/{card_id}"),
            json!({ "status": "available" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["assignedTo"], Value::Null);
    assert_eq!(card["assignedShopName"], Value::Null);

    let (_, shops) = ctx.get("/shops").await;
    assert_eq!(shops[0]["assignedSimCards"], json!([]));
}

#[tokio::test]
async fn inconsistent_update_is_400() {
    let ctx = TestContext::new().await;
    let card = ctx.create_card("C1").await;
    let card_id = id_of(&card);

    for body in [
        json!({ "status": "sold" }),
        json!({ "status": "assigned", "assignedTo": "nope" }),
    ] {
        let (status, _) = ctx.put(&format!("/simcards/{card_id}"), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = ctx
        .put(&format!("/simcards/{card_id}"), json!({ "status": "lost" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn manual_assignment_and_code_change() {
    let ctx = TestContext::new().await;
    let shop = ctx.create_shop("Kiosk", "East").await;
    let card = ctx.create_card("C1").await;
    ctx.create_card("C2").await;
    let card_id = id_of(&card);

    let (status, updated) = ctx
        .put(
            &format!("/simcards/{card_id}"),
            json!({ "status": "assigned", "assignedTo": id_of(&shop), "code": "C9" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["code"], "C9");
    assert_eq!(updated["assignedShopName"], "Kiosk");

    let (status, body) = ctx
        .put(&format!("/simcards/{card_id}"), json!({ "code": "C2" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "SimCard code already exists");

    let (status, same) = ctx.put(&format!("/simcards/{card_id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same, updated);
}

#[tokio::test]
async fn missing_card_is_404() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.put("/simcards/nope", json!({ "code": "X" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": 404, "detail": "SimCard not found" }));

    let (status, _) = ctx.delete("/simcards/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.get("/simcards/nope/check-status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_card() {
    let ctx = TestContext::new().await;
    let card = ctx.create_card("C1").await;
    let card_id = id_of(&card);

    let (status, body) = ctx.delete(&format!("/simcards/{card_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = ctx.delete(&format!("/simcards/{card_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn check_status_stamps_last_checked() {
    let ctx = TestContext::new().await;
    let card = ctx.create_card("C1").await;
    let card_id = id_of(&card);

    let (status, checked) = ctx.get(&format!("/simcards/{card_id}/check-status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked["id"], card_id.as_str());
    assert!(checked["lastChecked"].is_string());
}

#[tokio::test]
async fn auto_check_batch() {
    let ctx = TestContext::new().await;
    let a = ctx.create_card("C1").await;
    let b = ctx.create_card("C2").await;

    let (status, body) = ctx
        .post(
            "/simcards/auto-check",
            json!({ "simCards": [{ "id": id_of(&a) }, { "id": "nope" }, { "id": id_of(&b) }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let timestamp = body["timestamp"].as_str().unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["simCardId"], id_of(&a).as_str());
    assert_eq!(results[1]["simCardId"], id_of(&b).as_str());
    for result in results {
        assert_eq!(result["status"], "available");
        assert_eq!(result["isSold"], false);
        assert_eq!(result["saleDate"], Value::Null);
        assert_eq!(result["lastChecked"], timestamp);
    }

    let (status, body) = ctx.post("/simcards/auto-check", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
}
