//! Queue configuration.

use quake_core::limits::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT};
use serde::{Deserialize, Serialize};

/// Admission queue and worker pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum buffered records before admission is rejected
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Number of persistence workers draining the queue
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_workers() -> usize {
    DEFAULT_WORKER_COUNT
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            workers: default_workers(),
        }
    }
}
