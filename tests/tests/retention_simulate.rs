//! `/api/simulate` and `/api/cleanup`.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use quake_core::{EventRecord, EventStore};

#[tokio::test]
async fn test_simulated_events_are_removed_by_cleanup() {
    let ctx = TestContext::without_workers(10);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut created = Vec::new();
    for _ in 0..5 {
        let response = server.post("/api/simulate").await;
        response.assert_status(StatusCode::CREATED);
        let record: EventRecord = response.json();
        assert!(record.simulated);
        assert!(record.id.starts_with("sim_"));
        assert!((5.0..=9.0).contains(&record.magnitude));
        created.push(record.id);
    }

    // Simulation bypasses the queue.
    assert!(ctx.queue.is_empty());
    assert_eq!(ctx.store.get_all().await.unwrap().len(), 5);
    created.sort();
    created.dedup();
    assert_eq!(created.len(), 5);

    let response = server.delete("/api/cleanup").add_query_param("hours", "0").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted_count"], 5);
    assert_eq!(
        body["message"],
        "Cleanup removed 5 events (older than 1 hours, plus simulated)."
    );
    assert!(ctx.store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cleanup_keeps_recent_real_events() {
    let ctx = TestContext::without_workers(10);
    let rows = [
        fixtures::record("recent", "Here", 3.0, fixtures::hours_ago(0)),
        fixtures::record("stale", "There", 3.0, fixtures::hours_ago(3)),
        fixtures::record("day_old", "Elsewhere", 3.0, fixtures::hours_ago(25)),
    ];
    for row in &rows {
        ctx.store.upsert(row).await.unwrap();
    }
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Default window is one hour.
    let response = server.delete("/api/cleanup").await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["deleted_count"], 2);

    let left = ctx.store.get_all().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, "recent");
}

#[tokio::test]
async fn test_cleanup_with_wide_window() {
    let ctx = TestContext::without_workers(10);
    ctx.store
        .upsert(&fixtures::record("stale", "There", 3.0, fixtures::hours_ago(3)))
        .await
        .unwrap();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.delete("/api/cleanup").add_query_param("hours", "24").await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["deleted_count"], 0);

    // Repeating is harmless.
    let response = server.delete("/api/cleanup").add_query_param("hours", "24").await;
    assert_eq!(response.json::<serde_json::Value>()["deleted_count"], 0);
    assert_eq!(ctx.store.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cleanup_non_positive_hours_use_default_window() {
    let ctx = TestContext::without_workers(10);
    let rows = [
        fixtures::record("minute_old", "Here", 3.0, fixtures::hours_ago(0) - 60_000),
        fixtures::record("stale", "There", 3.0, fixtures::hours_ago(2)),
    ];
    for row in &rows {
        ctx.store.upsert(row).await.unwrap();
    }
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.delete("/api/cleanup").add_query_param("hours", "0").await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["deleted_count"], 1);

    let response = server.delete("/api/cleanup").add_query_param("hours", "-2").await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["deleted_count"], 0);

    let left = ctx.store.get_all().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, "minute_old");
}

#[tokio::test]
async fn test_cleanup_rejects_unparseable_hours() {
    let ctx = TestContext::without_workers(10);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.delete("/api/cleanup").add_query_param("hours", "abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["code"], "VALID_001");
}
