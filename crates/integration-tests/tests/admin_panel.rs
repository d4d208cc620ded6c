//! Admin panel API flow tests over the in-memory store.

use axum::http::{StatusCode, header};
use serde_json::json;

use cedars_integration_tests::{
    AdminHarness, admin_harness, body_json, body_text, expect_status, get, json_request, send,
    with_bearer,
};

/// Set the shared password and log in, returning a bearer token.
async fn login(harness: &AdminHarness) -> String {
    harness
        .state
        .auth()
        .set_password("hunter2!")
        .await
        .expect("set password");

    let body = json!({ "password": "hunter2!" });
    let response = expect_status(
        send(&harness.app, json_request("POST", "/login", &body)).await,
        StatusCode::OK,
    )
    .await;
    body_json(response).await["token"]
        .as_str()
        .expect("token")
        .to_owned()
}

#[tokio::test]
async fn test_login_before_setup_is_a_conflict() {
    let harness = admin_harness();
    let body = json!({ "password": "anything" });
    let response = send(&harness.app, json_request("POST", "/login", &body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("not configured"));
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let harness = admin_harness();
    harness
        .state
        .auth()
        .set_password("hunter2!")
        .await
        .expect("set password");

    let body = json!({ "password": "nope" });
    let response = send(&harness.app, json_request("POST", "/login", &body)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_services_require_a_valid_token() {
    let harness = admin_harness();
    let response = send(&harness.app, get("/services")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&harness.app, with_bearer(get("/services"), "made-up")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_the_token() {
    let harness = admin_harness();
    let token = login(&harness).await;

    let response = send(
        &harness.app,
        with_bearer(json_request("POST", "/logout", &json!({})), &token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&harness.app, with_bearer(get("/services"), &token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_service_crud_round_trip() {
    let harness = admin_harness();
    let token = login(&harness).await;

    // create with panel defaults
    let response = expect_status(
        send(
            &harness.app,
            with_bearer(json_request("POST", "/services", &json!({})), &token),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let created = body_json(response).await;
    assert_eq!(created["name"], "New Service");
    let id = created["id"].as_str().expect("id").to_owned();

    // rename it; id and updatedAt in the body must not leak into the document
    let patch = json!({ "name": "Netflix", "category": "Streaming", "id": "forged" });
    let response = expect_status(
        send(
            &harness.app,
            with_bearer(
                json_request("PATCH", &format!("/services/{id}"), &patch),
                &token,
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Netflix");
    assert_eq!(updated["id"], id.as_str());

    // search finds it case-insensitively
    let response = send(
        &harness.app,
        with_bearer(get("/services?search=netf"), &token),
    )
    .await;
    let listed = body_json(expect_status(response, StatusCode::OK).await).await;
    assert_eq!(listed.as_array().expect("list").len(), 1);

    // delete and confirm the list is empty
    let response = send(
        &harness.app,
        with_bearer(
            json_request("DELETE", &format!("/services/{id}"), &json!({})),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&harness.app, with_bearer(get("/services"), &token)).await;
    let listed = body_json(response).await;
    assert!(listed.as_array().expect("list").is_empty());
}

#[tokio::test]
async fn test_plan_lifecycle_by_stable_id() {
    let harness = admin_harness();
    let token = login(&harness).await;

    let created = body_json(
        send(
            &harness.app,
            with_bearer(json_request("POST", "/services", &json!({})), &token),
        )
        .await,
    )
    .await;
    let service_id = created["id"].as_str().expect("id").to_owned();

    // append a default plan
    let response = expect_status(
        send(
            &harness.app,
            with_bearer(
                json_request("POST", &format!("/services/{service_id}/plans"), &json!({})),
                &token,
            ),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let plan = body_json(response).await;
    assert_eq!(plan["label"], "New Plan");
    let plan_id = plan["id"].as_str().expect("plan id").to_owned();
    assert!(!plan_id.is_empty());

    // price it
    let patch = json!({
        "label": "1 Month",
        "costPrice": "3",
        "sellPrice": "5",
        "discount": "0"
    });
    let response = expect_status(
        send(
            &harness.app,
            with_bearer(
                json_request(
                    "PATCH",
                    &format!("/services/{service_id}/plans/{plan_id}"),
                    &patch,
                ),
                &token,
            ),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let updated = body_json(response).await;
    assert_eq!(updated["label"], "1 Month");
    assert_eq!(updated["id"], plan_id.as_str());

    // patching an unknown plan is a 404
    let response = send(
        &harness.app,
        with_bearer(
            json_request(
                "PATCH",
                &format!("/services/{service_id}/plans/no-such-plan"),
                &patch,
            ),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // remove it
    let response = send(
        &harness.app,
        with_bearer(
            json_request(
                "DELETE",
                &format!("/services/{service_id}/plans/{plan_id}"),
                &json!({}),
            ),
            &token,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &harness.app,
        with_bearer(get("/services"), &token),
    )
    .await;
    let listed = body_json(response).await;
    assert!(listed[0]["plans"].as_array().expect("plans").is_empty());
}

#[tokio::test]
async fn test_profit_report_for_one_service() {
    let harness = admin_harness();
    let token = login(&harness).await;

    let fields = json!({
        "name": "Netflix",
        "category": "Streaming",
        "plans": [
            { "id": "nf-month", "label": "1 Month", "duration": "Monthly",
              "costPrice": "3", "sellPrice": "5", "discount": "0" },
            { "id": "nf-year", "label": "1 Year", "duration": "Yearly",
              "costPrice": "30", "sellPrice": "45", "discount": "5" }
        ]
    });
    let id = cedars_integration_tests::seed_service(&harness.store, fields).await;

    let response = expect_status(
        send(
            &harness.app,
            with_bearer(get(&format!("/services/{id}/profit")), &token),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let report = body_json(response).await;

    assert_eq!(report["name"], "Netflix");
    // (5 - 0 - 3) + (45 - 5 - 30)
    assert_eq!(report["totalProfit"], "12.00");
    // round((12 * 5 - 45) / 60 * 100) = 25
    assert_eq!(report["savingsPercent"], 25);

    let plans = report["plans"].as_array().expect("plans");
    assert_eq!(plans[0]["finalPrice"], "5.00");
    assert_eq!(plans[0]["profit"], "2.00");
    assert_eq!(plans[1]["finalPrice"], "40.00");
    assert_eq!(plans[1]["profit"], "10.00");
}

#[tokio::test]
async fn test_csv_report_download() {
    let harness = admin_harness();
    let token = login(&harness).await;

    let fields = json!({
        "name": "Spotify, Premium",
        "category": "Music",
        "plans": [
            { "id": "sp-month", "label": "1 Month", "duration": "Monthly",
              "costPrice": "2", "sellPrice": "4", "discount": "0" }
        ]
    });
    cedars_integration_tests::seed_service(&harness.store, fields).await;

    let response = expect_status(
        send(&harness.app, with_bearer(get("/report.csv"), &token)).await,
        StatusCode::OK,
    )
    .await;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .expect("content type")
        .to_owned();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .expect("disposition")
        .to_owned();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains(".csv"));

    let body = body_text(response).await;
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("Service,Category,Plan,Type,Duration,Cost,Sell,Discount,FinalPrice,Profit,Stock")
    );
    // free-text fields come out quoted, so the embedded comma is safe
    assert!(body.contains("\"Spotify, Premium\""));
}
