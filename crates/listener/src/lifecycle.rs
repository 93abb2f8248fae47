//! Starting and stopping the queue worker.
//!
//! Lifecycle: construct [`QueueState`](crate::QueueState) → [`start`] →
//! serve requests → [`RunningWorker::stop`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::state::QueueState;
use crate::worker::{QueueWorker, WorkerExit};

/// Result of a [`RunningWorker::stop`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The worker exited within the timeout.
    Stopped(WorkerExit),
    /// The worker was still busy when the timeout elapsed. It is left to
    /// finish its current event on its own.
    TimedOut,
    /// The worker task itself ended abnormally.
    Crashed,
}

/// Handle to a started worker. Dropping it detaches the worker.
#[derive(Debug)]
pub struct RunningWorker {
    state: Arc<QueueState>,
    handle: JoinHandle<WorkerExit>,
}

/// Spawns `worker` as a background task and returns immediately.
///
/// The worker owns the queue's only receiver, so a queue can be started at
/// most once.
pub fn start(worker: QueueWorker) -> RunningWorker {
    let state = Arc::clone(worker.state());
    state.mark_running();
    let handle = tokio::spawn(worker.run());
    RunningWorker { state, handle }
}

impl RunningWorker {
    /// Shared state of the queue this worker consumes.
    pub fn state(&self) -> &Arc<QueueState> {
        &self.state
    }

    /// Returns `true` once the worker task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Requests shutdown and waits up to `timeout` for the worker to exit.
    ///
    /// The event being processed (if any) is allowed to finish; nothing is
    /// dequeued after it. Never fails: a worker that outlives `timeout` is
    /// reported as [`StopOutcome::TimedOut`] and left running detached.
    pub async fn stop(mut self, timeout: Duration) -> StopOutcome {
        let pending = self.state.queue_size();
        tracing::info!(pending, ?timeout, "Stopping queue worker");

        self.state.mark_stopped();
        if self.state.queue().enqueue_stop().is_err() {
            tracing::debug!("Queue worker already gone; no sentinel sent");
        }

        match tokio::time::timeout(timeout, &mut self.handle).await {
            Ok(Ok(exit)) => StopOutcome::Stopped(exit),
            Ok(Err(join_error)) => {
                tracing::error!(error = %join_error, "Queue worker task ended abnormally");
                StopOutcome::Crashed
            }
            Err(_) => {
                tracing::warn!(?timeout, "Queue worker did not stop within timeout");
                StopOutcome::TimedOut
            }
        }
    }
}
