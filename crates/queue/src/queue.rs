//! Fixed-capacity FIFO buffer between admission and the worker pool.
//!
//! Built on a bounded tokio mpsc channel. The queue owns the only sender, so
//! `close()` drops it: consumers keep draining whatever is buffered and then see
//! `None`. The receiver sits behind an async mutex so any number of workers can
//! share it; whichever worker holds the lock is the one parked on `recv`.

use parking_lot::RwLock;
use quake_core::EventRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Why a non-blocking push did not enqueue. The record is handed back.
#[derive(Debug)]
pub enum PushError {
    Full(EventRecord),
    Closed(EventRecord),
}

impl PushError {
    pub fn into_record(self) -> EventRecord {
        match self {
            Self::Full(r) | Self::Closed(r) => r,
        }
    }
}

pub struct BoundedQueue {
    sender: RwLock<Option<mpsc::Sender<EventRecord>>>,
    receiver: Mutex<mpsc::Receiver<EventRecord>>,
    capacity: usize,
    occupancy: AtomicUsize,
}

impl BoundedQueue {
    /// Creates a queue holding at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            sender: RwLock::new(Some(tx)),
            receiver: Mutex::new(rx),
            capacity,
            occupancy: AtomicUsize::new(0),
        }
    }

    /// Inserts without waiting. Fails immediately when full or closed.
    pub fn try_push(&self, record: EventRecord) -> Result<(), PushError> {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return Err(PushError::Closed(record));
        };

        // Count before sending: a consumer can only decrement for a record it
        // has received, so the counter never dips below what is buffered.
        self.occupancy.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(record) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.occupancy.fetch_sub(1, Ordering::AcqRel);
                match e {
                    mpsc::error::TrySendError::Full(r) => Err(PushError::Full(r)),
                    mpsc::error::TrySendError::Closed(r) => Err(PushError::Closed(r)),
                }
            }
        }
    }

    /// Waits for the next record. Returns `None` once the queue is closed and drained.
    pub async fn take(&self) -> Option<EventRecord> {
        let record = self.receiver.lock().await.recv().await;
        if record.is_some() {
            self.occupancy.fetch_sub(1, Ordering::AcqRel);
        }
        record
    }

    /// Stops admission. Buffered records remain available to `take`.
    /// Returns `true` for the call that actually closed the queue.
    pub fn close(&self) -> bool {
        let closed = self.sender.write().take().is_some();
        if closed {
            debug!(buffered = self.len(), "Queue closed");
        }
        closed
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Records currently buffered. A push racing with this call may be
    /// counted a moment early, never past capacity.
    pub fn len(&self) -> usize {
        self.occupancy.load(Ordering::Acquire).min(self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
