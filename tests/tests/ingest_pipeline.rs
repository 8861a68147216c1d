//! Admission → queue → worker pool → store, driven through the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    mocks::FailingStore,
    setup::{ContextOptions, TestContext},
};
use quake_core::EventStore;
use std::sync::Arc;
use std::time::Duration;

/// A queued record is persisted by a worker after the response is returned.
#[tokio::test]
async fn test_ingested_event_is_persisted() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let event = fixtures::sensor_event(4.2);
    let response = server.post("/api/ingest").json(&event).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "queued");
    assert_eq!(body["id"], event["id"]);

    assert_eq!(ctx.wait_for_count(1, Duration::from_secs(2)).await, 1);
    let stored = ctx.store.get_all().await.unwrap();
    assert_eq!(stored[0].id, event["id"].as_str().unwrap());
    assert!(!stored[0].simulated);
    assert_eq!(stored[0].depth_km(), Some(8.2));
}

/// Missing ids are generated and echoed back.
#[tokio::test]
async fn test_missing_id_is_generated() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/ingest")
        .json(&serde_json::json!({
            "place": "Somewhere",
            "magnitude": 2.0,
            "time": 1_700_000_000_000i64
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("evt_"));

    assert_eq!(ctx.wait_for_count(1, Duration::from_secs(2)).await, 1);
    assert_eq!(ctx.store.get_all().await.unwrap()[0].id, id);
}

/// With nothing draining the queue, exactly `capacity` requests are queued and
/// every later one is rejected without waiting.
#[tokio::test]
async fn test_full_queue_rejects_overflow() {
    let ctx = TestContext::without_workers(100);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut queued = 0;
    let mut rejected = 0;
    for event in fixtures::sensor_events(150) {
        let response = server.post("/api/ingest").json(&event).await;
        let body: serde_json::Value = response.json();
        match response.status_code() {
            StatusCode::OK => {
                assert_eq!(body["status"], "queued");
                queued += 1;
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                assert_eq!(body["status"], "queue_full");
                assert!(body.get("id").is_none());
                rejected += 1;
            }
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(queued, 100);
    assert_eq!(rejected, 50);
    assert_eq!(ctx.queue.len(), 100);
    assert!(ctx.store.get_all().await.unwrap().is_empty());
}

/// Re-ingesting the same id replaces the stored record.
#[tokio::test]
async fn test_same_id_is_replaced_not_duplicated() {
    let ctx = TestContext::new();
    let store = ctx.store.clone();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut event = fixtures::sensor_event(3.0);
    server.post("/api/ingest").json(&event).await.assert_status_ok();
    assert_eq!(ctx.wait_for_count(1, Duration::from_secs(2)).await, 1);

    event["magnitude"] = serde_json::json!(5.5);
    server.post("/api/ingest").json(&event).await.assert_status_ok();

    let report = ctx.shutdown().await;
    assert_eq!(report.panicked, 0);

    let stored = store.get_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].magnitude, 5.5);
}

/// Shutdown drains everything that was admitted.
#[tokio::test]
async fn test_shutdown_drains_admitted_events() {
    let store = Arc::new(quake_core::MemoryStore::new());
    let ctx = TestContext::with_store(
        store.clone(),
        ContextOptions {
            workers: 2,
            ..Default::default()
        },
    );
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for event in fixtures::sensor_events(40) {
        server.post("/api/ingest").json(&event).await.assert_status_ok();
    }

    let report = ctx.shutdown().await;
    assert_eq!(report.persisted, 40);
    assert_eq!(store.len(), 40);
}

/// A failing store drops the record after one attempt; the pool keeps going.
#[tokio::test]
async fn test_store_failure_drops_record_without_retry() {
    let store = Arc::new(FailingStore::new());
    let ctx = TestContext::with_store(store.clone(), ContextOptions::default());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    store.set_fail_writes(true);
    server
        .post("/api/ingest")
        .json(&fixtures::sensor_event(2.0))
        .await
        .assert_status_ok();

    let start = std::time::Instant::now();
    while store.upsert_attempts() == 0 && start.elapsed() < Duration::from_secs(2) {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.upsert_attempts(), 1);
    assert!(store.inner().is_empty());

    store.set_fail_writes(false);
    server
        .post("/api/ingest")
        .json(&fixtures::sensor_event(2.0))
        .await
        .assert_status_ok();

    let report = ctx.shutdown().await;
    assert_eq!(report.panicked, 0);
    assert_eq!(store.inner().len(), 1);
    assert_eq!(store.upsert_attempts(), 2);
}
