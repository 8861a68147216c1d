//! `/api/fetch-now` relay to the sensor fetch agent.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures::FakeAgent,
    setup::{TestContext, UNREACHABLE_AGENT},
};

#[tokio::test]
async fn test_range_is_forwarded_and_reply_relayed() {
    let agent = FakeAgent::start(
        StatusCode::ACCEPTED,
        serde_json::json!({"status": "started", "range": "day"}),
    )
    .await;
    let ctx = TestContext::with_fetch_agent(agent.url.clone());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/fetch-now")
        .json(&serde_json::json!({"range": "day"}))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    assert_eq!(
        response.json::<serde_json::Value>(),
        serde_json::json!({"status": "started", "range": "day"})
    );
    assert_eq!(agent.received(), vec![serde_json::json!({"range": "day"})]);
}

#[tokio::test]
async fn test_missing_range_defaults_to_hour() {
    let agent = FakeAgent::start(StatusCode::OK, serde_json::json!({"ok": true})).await;
    let ctx = TestContext::with_fetch_agent(agent.url.clone());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.post("/api/fetch-now").await.assert_status_ok();
    assert_eq!(agent.received(), vec![serde_json::json!({"range": "hour"})]);
}

#[tokio::test]
async fn test_agent_error_status_is_relayed_unchanged() {
    let agent = FakeAgent::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({"error": "upstream feed down"}),
    )
    .await;
    let ctx = TestContext::with_fetch_agent(agent.url.clone());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/fetch-now")
        .json(&serde_json::json!({"range": "week"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>()["error"],
        "upstream feed down"
    );
}

#[tokio::test]
async fn test_unreachable_agent_returns_503() {
    let ctx = TestContext::with_fetch_agent(UNREACHABLE_AGENT);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/fetch-now")
        .json(&serde_json::json!({"range": "hour"}))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<serde_json::Value>()["code"], "UPSTREAM_001");
}
