//! Fixed-size pool of consumer workers sharing one queue.

use event_queue::BoundedQueue;
use quake_core::EventStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::consumer::ConsumerWorker;

/// Totals reported when the pool has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub persisted: u64,
    /// Workers that exited abnormally. Store panics are absorbed per record,
    /// so this only counts failures outside a store call.
    pub panicked: usize,
}

pub struct WorkerPool {
    queue: Arc<BoundedQueue>,
    handles: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Spawns `workers` consumers (at least one) on the current runtime.
    pub fn start(queue: Arc<BoundedQueue>, store: Arc<dyn EventStore>, workers: usize) -> Self {
        let workers = workers.max(1);
        let handles = (0..workers)
            .map(|id| {
                let worker = ConsumerWorker::new(id, queue.clone(), store.clone());
                tokio::spawn(async move { worker.run().await })
            })
            .collect();

        info!(
            workers,
            capacity = queue.capacity(),
            backend = store.backend(),
            "Worker pool started"
        );
        Self { queue, handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    pub fn queue(&self) -> &Arc<BoundedQueue> {
        &self.queue
    }

    /// Closes the queue, lets the workers drain what is buffered, and waits
    /// for all of them.
    pub async fn shutdown(self) -> PoolReport {
        self.queue.close();
        self.join().await
    }

    /// Waits for every worker to exit. Only returns once the queue has been
    /// closed by someone.
    pub async fn join(self) -> PoolReport {
        let mut report = PoolReport::default();
        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.await {
                Ok(persisted) => report.persisted += persisted,
                Err(e) => {
                    report.panicked += 1;
                    error!(worker = id, error = %e, "Worker exited abnormally");
                }
            }
        }

        info!(
            persisted = report.persisted,
            panicked = report.panicked,
            "Worker pool stopped"
        );
        report
    }
}
