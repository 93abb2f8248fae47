//! Card relay event intake and queue processing.
//!
//! Board webhooks arrive on a multi-threaded HTTP front end that must answer
//! quickly, while the work each event triggers (LLM calls, several board API
//! writes) is slow and externally rate-limited. This crate decouples the two:
//!
//! - [`intake`]: the `axum` router. Filters deliveries and enqueues
//!   accepted events; never waits on processing.
//! - [`queue`]: an unbounded FIFO with many producers and one consumer.
//! - [`worker`]: the single consumer. Processes one event at a time in
//!   enqueue order inside a failure boundary.
//! - [`lifecycle`]: starts the worker and stops it with a bounded wait.
//! - [`state`]: the shared [`QueueState`] behind `GET /queue/status`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport and scheduling live here. What happens to an
//! event is delegated to a [`relay::EventProcessor`]; status lines go to a
//! [`relay::StatusReporter`].
//!
//! ## Ordering
//!
//! Because only the worker ever calls the processor, all board-mutating calls
//! and status-channel posts for queued events are serialised without locks.
//! Two events for the same card can never race.

pub mod intake;
pub mod lifecycle;
pub mod queue;
pub mod state;
pub mod worker;

pub use intake::{classify, router, IgnoreReason, IntakeDecision};
pub use lifecycle::{start, RunningWorker, StopOutcome};
pub use queue::{event_queue, Dequeued, EventQueue, QueueError, QueueItem, QueueReceiver};
pub use state::{QueueState, QueueStatus};
pub use worker::{QueueWorker, WorkerExit, DEFAULT_POLL_INTERVAL, DRAINED_LINE};
