//! The single consumer of the event queue.
//!
//! The worker dequeues one event, runs the event processor on it to
//! completion, and only then dequeues the next. Processing failures (errors
//! and panics) are reported and the event is dropped; they never end the
//! loop.

use std::sync::Arc;
use std::time::Duration;

use relay::{EventProcessor, QueuedEvent, RelayError, StatusReporter};
use tracing::Instrument;

use crate::queue::{Dequeued, QueueItem, QueueReceiver};
use crate::state::QueueState;

/// Default interval at which an idle worker re-checks the stop flag.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Status line emitted when the queue empties after processing.
pub const DRAINED_LINE: &str = "📭 Webhook queue drained";

/// Why the worker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The stop sentinel was dequeued.
    Sentinel,
    /// The stop flag was observed between dequeues.
    StopFlag,
    /// Every producer handle was dropped.
    Closed,
}

/// Queue consumer. Owns the only [`QueueReceiver`], so at most one worker
/// can exist per queue.
pub struct QueueWorker {
    receiver: QueueReceiver,
    state: Arc<QueueState>,
    processor: Arc<dyn EventProcessor>,
    reporter: Arc<dyn StatusReporter>,
    poll_interval: Duration,
}

impl QueueWorker {
    /// Creates a worker with the default poll interval.
    pub fn new(
        receiver: QueueReceiver,
        state: Arc<QueueState>,
        processor: Arc<dyn EventProcessor>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            receiver,
            state,
            processor,
            reporter,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides how long each dequeue waits before re-checking the stop flag.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Shared state this worker reports into.
    pub fn state(&self) -> &Arc<QueueState> {
        &self.state
    }

    /// Runs the loop until the sentinel, the stop flag, or queue closure.
    pub async fn run(mut self) -> WorkerExit {
        self.state.mark_running();
        tracing::info!(
            poll_interval = ?self.poll_interval,
            "Queue worker started"
        );

        let exit = loop {
            if !self.state.is_running() {
                break WorkerExit::StopFlag;
            }

            match self.receiver.dequeue_blocking(self.poll_interval).await {
                Dequeued::Idle => continue,
                Dequeued::Closed => break WorkerExit::Closed,
                Dequeued::Item(QueueItem::Stop) => break WorkerExit::Sentinel,
                Dequeued::Item(QueueItem::Event(event)) => {
                    // Stop may have begun while this dequeue was parked.
                    if !self.state.is_running() {
                        tracing::info!(
                            event_id = %event.event_id,
                            "Event arrived after stop began; not processed"
                        );
                        break WorkerExit::StopFlag;
                    }
                    self.process_contained(*event).await;
                    if self.receiver.size() == 0 && self.state.is_running() {
                        tracing::info!("Queue drained");
                        self.reporter.log(DRAINED_LINE).await;
                    }
                }
            }
        };

        self.state.mark_stopped();
        let abandoned = self.receiver.size();
        if abandoned > 0 {
            tracing::warn!(abandoned, "Queue worker stopped with events still queued");
        }
        tracing::info!(?exit, "Queue worker stopped");
        exit
    }

    /// Runs the processor for one event inside a failure boundary.
    ///
    /// The event runs on its own task so a panic surfaces as a `JoinError`
    /// here instead of unwinding through the loop. The task is awaited before
    /// returning; processing stays strictly sequential.
    async fn process_contained(&self, event: QueuedEvent) {
        let span = tracing::info_span!(
            "process_event",
            event_id = %event.event_id,
            record_id = %event.record_id,
            event_type = %event.event_type,
        );
        let name = event.display_name().to_string();
        let event_type = event.event_type;

        let processor = Arc::clone(&self.processor);
        let task = tokio::spawn(
            async move { processor.process(&event).await }.instrument(span.clone()),
        );

        let result = match task.await {
            Ok(result) => result,
            Err(join_error) => Err(RelayError::Aborted {
                reason: if join_error.is_panic() {
                    "event processor panicked".to_string()
                } else {
                    "processing task was cancelled".to_string()
                },
            }),
        };

        match result {
            Ok(()) => {
                self.state.record_processed();
                tracing::info!(parent: &span, "Event processed");
            }
            Err(err) => {
                self.state.record_failed();
                tracing::error!(parent: &span, error = %err, "Event processing failed; event dropped");
                self.reporter
                    .log(&format!("❌ Webhook error ({event_type} on '{name}'): {err}"))
                    .await;
            }
        }
    }
}
