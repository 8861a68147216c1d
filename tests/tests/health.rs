//! Tests for health check endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    mocks::FailingStore,
    setup::{ContextOptions, TestContext},
};
use std::sync::Arc;

/// Test /health endpoint returns proper structure
#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = TestContext::without_workers(100);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("status").is_some());
    assert_eq!(body["store_backend"], "memory");
    assert_eq!(body["store_connected"], true);
    assert_eq!(body["queue_depth"], 0);
    assert_eq!(body["queue_capacity"], 100);
    assert!(body.get("fetch_agent_reachable").is_some());
}

/// Queue depth reflects admitted but unpersisted records.
#[tokio::test]
async fn test_health_reports_queue_depth() {
    let ctx = TestContext::without_workers(5);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..3 {
        server
            .post("/api/ingest")
            .json(&integration_tests::fixtures::sensor_event(2.0))
            .await
            .assert_status_ok();
    }

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["queue_depth"], 3);
    assert_eq!(body["queue_capacity"], 5);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let ctx = TestContext::without_workers(10);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.get("/health/live").await.assert_status_ok();
    server.get("/health/ready").await.assert_status_ok();
}

/// An unreachable store fails readiness but not liveness.
#[tokio::test]
async fn test_unreachable_store_is_not_ready() {
    let store = Arc::new(FailingStore::new());
    store.set_fail_reads(true);
    let ctx = TestContext::with_store(
        store,
        ContextOptions {
            workers: 0,
            ..Default::default()
        },
    );
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    server.get("/health/live").await.assert_status_ok();

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["store_connected"], false);
    assert_eq!(body["store_backend"], "failing-mock");
}
