//! Validation failures on the ingest endpoint.
//!
//! Every rejected payload gets a 400 with a stable error code and is never
//! admitted to the queue.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

async fn post_rejected(body: serde_json::Value) -> (serde_json::Value, usize) {
    let ctx = TestContext::without_workers(10);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.post("/api/ingest").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    (response.json(), ctx.queue.len())
}

#[tokio::test]
async fn test_malformed_json_returns_valid_001() {
    let ctx = TestContext::without_workers(10);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/ingest")
        .content_type("application/json")
        .text("{\"id\": \"us1\", \"magnitude\": ")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
    assert!(ctx.queue.is_empty());
}

#[tokio::test]
async fn test_wrong_field_type_returns_valid_001() {
    let (body, queued) = post_rejected(serde_json::json!({
        "id": "us1",
        "magnitude": "strong",
        "time": 1
    }))
    .await;
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(queued, 0);
}

#[tokio::test]
async fn test_magnitude_out_of_range_returns_valid_002() {
    let mut event = fixtures::sensor_event(4.0);
    event["magnitude"] = serde_json::json!(12.5);

    let (body, queued) = post_rejected(event).await;
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(body["error"], "Validation failed");
    assert!(body["details"][0].as_str().unwrap().contains("magnitude"));
    assert_eq!(queued, 0);
}

#[tokio::test]
async fn test_coordinates_need_three_components() {
    let mut event = fixtures::sensor_event(4.0);
    event["coordinates"] = serde_json::json!([-117.6, 35.7]);

    let (body, queued) = post_rejected(event).await;
    assert!(body["code"].as_str().unwrap().starts_with("VALID_"));
    assert_eq!(queued, 0);
}

#[tokio::test]
async fn test_simulated_flag_is_refused() {
    let mut event = fixtures::sensor_event(4.0);
    event["is_simulated"] = serde_json::json!(true);

    let (body, queued) = post_rejected(event).await;
    assert_eq!(body["code"], "VALID_003");
    assert_eq!(queued, 0);
}

#[tokio::test]
async fn test_reserved_id_prefix_is_refused() {
    let mut event = fixtures::sensor_event(4.0);
    event["id"] = serde_json::json!("sim_us_spoofed");

    let (body, queued) = post_rejected(event).await;
    assert_eq!(body["code"], "VALID_003");
    assert_eq!(queued, 0);
}

#[tokio::test]
async fn test_oversized_payload_is_refused() {
    let mut event = fixtures::sensor_event(4.0);
    event["place"] = serde_json::json!("x".repeat(70_000));

    let (body, queued) = post_rejected(event).await;
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(queued, 0);
}
