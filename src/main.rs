//! Seismic event ingestion service.
//!
//! - Validated admission of sensor records into a bounded queue
//! - A fixed worker pool persisting records into ClickHouse
//! - Query, CSV export, retention cleanup and simulation endpoints
//! - A relay for manual fetch triggers to the sensor agent

mod settings;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState, FetchAgentClient};
use clickhouse_store::{ClickHouseClient, ClickHouseStore};
use event_queue::{AdmissionGate, BoundedQueue};
use quake_core::{EventStore, MemoryStore, RetentionPolicy};
use settings::{Settings, StoreBackend};
use telemetry::{health, init_tracing_from_env, metrics};
use worker::{WorkerPool, WorkerScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting seismic ingestion service v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    info!(
        backend = ?settings.store.backend,
        capacity = settings.queue.capacity,
        workers = settings.queue.workers,
        retention_hours = settings.retention.window_hours,
        "Loaded configuration"
    );

    let store = build_store(&settings).await;
    check_health(store.as_ref()).await;

    // Pipeline: admission gate -> bounded queue -> worker pool -> store
    let queue = Arc::new(BoundedQueue::new(settings.queue.capacity));
    let pool = WorkerPool::start(queue.clone(), store.clone(), settings.queue.workers);

    let scheduler = Arc::new(WorkerScheduler::new(settings.worker_config(), store.clone()));
    let background = scheduler.start();

    let fetch_agent = FetchAgentClient::new(&settings.fetch_agent.url, settings.fetch_timeout())
        .context("Failed to create fetch agent client")?;

    let state = AppState::new(store.clone(), AdmissionGate::new(queue.clone()), fetch_agent)
        .with_retention(RetentionPolicy::with_window_hours(settings.retention.window_hours));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!(buffered = queue.len(), "Shutting down...");

    for handle in background {
        handle.abort();
    }

    // Close admission and let the workers drain what is already buffered.
    let report = pool.shutdown().await;
    if report.panicked > 0 {
        warn!(panicked = report.panicked, "Some workers exited abnormally");
    }

    metrics().snapshot().log();
    info!("Shutdown complete");
    Ok(())
}

async fn build_store(settings: &Settings) -> Arc<dyn EventStore> {
    match settings.store.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory event store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::ClickHouse => {
            let client = ClickHouseClient::new(settings.store.clickhouse.clone());

            if let Err(e) = clickhouse_store::health::init_schema(&client).await {
                error!("Failed to initialize ClickHouse schema: {}", e);
                // Continue anyway - schema might already exist
            }

            Arc::new(ClickHouseStore::new(client))
        }
    }
}

/// Check store health on startup.
async fn check_health(store: &dyn EventStore) {
    match store.ping().await {
        Ok(()) => {
            health().store.set_healthy();
            info!(backend = store.backend(), "Event store connection: healthy");
        }
        Err(e) => {
            health().store.set_unhealthy(e.to_string());
            error!(backend = store.backend(), error = %e, "Event store connection: unhealthy");
        }
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
