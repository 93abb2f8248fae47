//! Process-wide queue state shared by the intake endpoint, the worker, and
//! the lifecycle controller.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use relay::{QueuedEvent, Timestamp};
use serde::Serialize;

use crate::queue::{event_queue, EventQueue, QueueError, QueueReceiver};

const PHASE_NOT_STARTED: u8 = 0;
const PHASE_RUNNING: u8 = 1;
const PHASE_STOPPED: u8 = 2;

/// Snapshot served by `GET /queue/status`.
#[derive(Debug, Clone, Serialize)]
pub struct QueueStatus {
    /// Events accepted and not yet dequeued.
    pub queue_size: usize,
    /// Whether the worker is between start and stop.
    pub processor_running: bool,
    /// When the snapshot was taken.
    pub timestamp: Timestamp,
}

/// Single shared instance per process, constructed before the worker starts.
///
/// The worker phase only moves forward: not started → running → stopped.
/// Once stopped it never reports running again.
#[derive(Debug)]
pub struct QueueState {
    queue: EventQueue,
    phase: AtomicU8,
    processed: AtomicU64,
    failed: AtomicU64,
}

impl QueueState {
    /// Creates the shared state and the receiver the worker will own.
    pub fn new() -> (Arc<Self>, QueueReceiver) {
        let (queue, receiver) = event_queue();
        let state = Arc::new(Self {
            queue,
            phase: AtomicU8::new(PHASE_NOT_STARTED),
            processed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        });
        (state, receiver)
    }

    /// Producer handle for the shared queue.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Enqueues an accepted event.
    pub fn enqueue(&self, event: QueuedEvent) -> Result<(), QueueError> {
        self.queue.enqueue(event)
    }

    /// Events accepted and not yet dequeued.
    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    /// `true` from worker start until stop is requested or the sentinel is seen.
    pub fn is_running(&self) -> bool {
        self.phase.load(Ordering::SeqCst) == PHASE_RUNNING
    }

    /// Events whose processing finished without error.
    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Events whose processing failed and were dropped.
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Current status snapshot.
    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            queue_size: self.queue_size(),
            processor_running: self.is_running(),
            timestamp: Timestamp::now(),
        }
    }

    /// Moves not started → running. Returns `false` if already past that point.
    pub(crate) fn mark_running(&self) -> bool {
        self.phase
            .compare_exchange(
                PHASE_NOT_STARTED,
                PHASE_RUNNING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Moves to stopped. Returns `true` only for the call that performed the
    /// running → stopped transition.
    pub(crate) fn mark_stopped(&self) -> bool {
        self.phase.swap(PHASE_STOPPED, Ordering::SeqCst) == PHASE_RUNNING
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}
