//! Storefront API flow tests over the in-memory store.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use cedars_integration_tests::{
    body_json, expect_status, get, json_request, seed_service, send, storefront_harness,
};
use cedars_store::MemoryStore;

async fn seeded_harness() -> cedars_integration_tests::StorefrontHarness {
    let store = Arc::new(MemoryStore::new());
    seed_service(
        &store,
        json!({
            "name": "Netflix",
            "category": "Streaming",
            "plans": [
                { "id": "nf-month", "label": "1 Month", "duration": "Monthly",
                  "costPrice": "3", "sellPrice": "5", "discount": "0" },
                { "id": "nf-year", "label": "1 Year", "duration": "Yearly",
                  "costPrice": "30", "sellPrice": "45", "discount": "5" }
            ]
        }),
    )
    .await;
    seed_service(
        &store,
        json!({
            "name": "Steam Wallet",
            "category": "Gift Cards",
            "plans": [
                { "id": "st-10", "label": "10 USD", "type": "Top-Up",
                  "costPrice": "9", "sellPrice": "11", "discount": "0" },
                { "id": "st-50", "label": "50 USD", "type": "Top-Up",
                  "costPrice": "46", "sellPrice": "53", "discount": "2", "inStock": false }
            ]
        }),
    )
    .await;
    storefront_harness(store).await
}

#[tokio::test]
async fn test_catalog_lists_everything_with_best_deal() {
    let harness = seeded_harness().await;
    let response = expect_status(send(&harness.app, get("/catalog")).await, StatusCode::OK).await;
    let body = body_json(response).await;

    assert_eq!(body["services"].as_array().expect("services").len(), 2);
    // highest markup: Netflix 1 Month at (5-3)/3 = ~67%
    assert_eq!(body["bestDeal"]["planId"], "nf-month");
}

#[tokio::test]
async fn test_catalog_search_narrows_but_best_deal_stays_global() {
    let harness = seeded_harness().await;
    let response = send(&harness.app, get("/catalog?search=steam")).await;
    let body = body_json(expect_status(response, StatusCode::OK).await).await;

    let services = body["services"].as_array().expect("services");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "Steam Wallet");
    assert_eq!(body["bestDeal"]["planId"], "nf-month");
}

#[tokio::test]
async fn test_catalog_category_and_stock_filters() {
    let harness = seeded_harness().await;
    let response = send(&harness.app, get("/catalog?category=gift-cards&in_stock=true")).await;
    let body = body_json(expect_status(response, StatusCode::OK).await).await;

    let services = body["services"].as_array().expect("services");
    assert_eq!(services.len(), 1);
    let plans = services[0]["plans"].as_array().expect("plans");
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["label"], "10 USD");
}

#[tokio::test]
async fn test_catalog_rejects_unknown_sort() {
    let harness = seeded_harness().await;
    let response = send(&harness.app, get("/catalog?sort=cheapest")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deep_link_by_service_slug() {
    let harness = seeded_harness().await;
    let response = send(&harness.app, get("/catalog/steam-wallet")).await;
    let body = body_json(expect_status(response, StatusCode::OK).await).await;

    let services = body["services"].as_array().expect("services");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "Steam Wallet");
}

#[tokio::test]
async fn test_deep_link_by_category_slug() {
    let harness = seeded_harness().await;
    let response = send(&harness.app, get("/catalog/streaming")).await;
    let body = body_json(expect_status(response, StatusCode::OK).await).await;

    let services = body["services"].as_array().expect("services");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "Netflix");
}

#[tokio::test]
async fn test_deep_link_unknown_slug_is_404() {
    let harness = seeded_harness().await;
    let response = send(&harness.app, get("/catalog/disney-plus")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bundle_quote_applies_volume_discount() {
    let harness = seeded_harness().await;
    let item = |label: &str| {
        json!({
            "serviceName": "Any",
            "plan": { "id": label, "label": label, "sellPrice": "10", "discount": "0" }
        })
    };

    let two = json!({ "items": [item("a"), item("b")] });
    let body = body_json(
        expect_status(
            send(&harness.app, json_request("POST", "/bundle/quote", &two)).await,
            StatusCode::OK,
        )
        .await,
    )
    .await;
    assert_eq!(body["total"], "30.00");
    assert_eq!(body["discountApplied"], false);

    let three = json!({ "items": [item("a"), item("b"), item("c")] });
    let body = body_json(
        expect_status(
            send(&harness.app, json_request("POST", "/bundle/quote", &three)).await,
            StatusCode::OK,
        )
        .await,
    )
    .await;
    assert_eq!(body["subtotal"], "30.00");
    assert_eq!(body["total"], "27.00");
    assert_eq!(body["discountApplied"], true);
}

#[tokio::test]
async fn test_order_produces_chat_link_and_is_remembered() {
    let harness = seeded_harness().await;

    // resolve ids from the live catalog
    let catalog = body_json(send(&harness.app, get("/catalog")).await).await;
    let netflix = catalog["services"]
        .as_array()
        .expect("services")
        .iter()
        .find(|s| s["name"] == "Netflix")
        .expect("netflix seeded");
    let order = json!({
        "serviceId": netflix["id"],
        "planId": "nf-month",
        "customerEmail": "jo@example.com",
        "customerPhone": "+96171000000"
    });

    let body = body_json(
        expect_status(
            send(&harness.app, json_request("POST", "/orders", &order)).await,
            StatusCode::OK,
        )
        .await,
    )
    .await;
    let link = body["link"].as_str().expect("link");
    assert!(link.starts_with("https://wa.me/96170000000?text="));
    assert!(link.contains("Netflix"));
    assert!(body["message"].as_str().expect("message").contains("1 Month"));

    let last = body_json(send(&harness.app, get("/orders/last")).await).await;
    assert_eq!(last["serviceName"], "Netflix");
    assert_eq!(last["customerEmail"], "jo@example.com");
}

#[tokio::test]
async fn test_order_for_unknown_plan_is_404() {
    let harness = seeded_harness().await;
    let catalog = body_json(send(&harness.app, get("/catalog")).await).await;
    let service_id = catalog["services"][0]["id"].clone();

    let order = json!({ "serviceId": service_id, "planId": "no-such-plan" });
    let response = send(&harness.app, json_request("POST", "/orders", &order)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_help_link() {
    let harness = seeded_harness().await;
    let body = body_json(send(&harness.app, get("/help/link")).await).await;
    let link = body["link"].as_str().expect("link");
    assert!(link.starts_with("https://wa.me/96170000000?text="));
    assert!(link.contains("help"));
}

#[tokio::test]
async fn test_theme_preference_round_trip() {
    let harness = seeded_harness().await;

    let body = body_json(send(&harness.app, get("/prefs/theme")).await).await;
    assert_eq!(body["dark"], true);

    let update = json!({ "dark": false });
    send(&harness.app, json_request("PUT", "/prefs/theme", &update)).await;

    let body = body_json(send(&harness.app, get("/prefs/theme")).await).await;
    assert_eq!(body["dark"], false);
}

#[tokio::test]
async fn test_favorites_toggle_feeds_the_favorites_filter() {
    let harness = seeded_harness().await;
    let catalog = body_json(send(&harness.app, get("/catalog")).await).await;
    let netflix_id = catalog["services"]
        .as_array()
        .expect("services")
        .iter()
        .find(|s| s["name"] == "Netflix")
        .expect("netflix seeded")["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let toggle = body_json(
        send(
            &harness.app,
            json_request("POST", &format!("/prefs/favorites/{netflix_id}"), &json!({})),
        )
        .await,
    )
    .await;
    assert_eq!(toggle["favorite"], true);

    let body = body_json(send(&harness.app, get("/catalog?favorites=true")).await).await;
    let services = body["services"].as_array().expect("services");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["name"], "Netflix");

    // toggling again clears it
    let toggle = body_json(
        send(
            &harness.app,
            json_request("POST", &format!("/prefs/favorites/{netflix_id}"), &json!({})),
        )
        .await,
    )
    .await;
    assert_eq!(toggle["favorite"], false);
}

#[tokio::test]
async fn test_plan_type_preference_rejects_unknown_values() {
    let harness = seeded_harness().await;

    let ok = json!({ "planType": "Top-Up" });
    let response = send(&harness.app, json_request("PUT", "/prefs/plan-type", &ok)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bad = json!({ "planType": "Lifetime" });
    let response = send(&harness.app, json_request("PUT", "/prefs/plan-type", &bad)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
