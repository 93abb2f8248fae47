//! Queue worker and lifecycle behaviour against scripted collaborators.

mod common;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{event, Gate, RecordingReporter, ScriptedProcessor, TEST_POLL};
use listener::{
    start, QueueError, QueueReceiver, QueueState, QueueWorker, RunningWorker, StopOutcome,
    WorkerExit, DRAINED_LINE,
};

const GUARD: Duration = Duration::from_secs(5);

fn launch(
    state: Arc<QueueState>,
    rx: QueueReceiver,
    processor: Arc<ScriptedProcessor>,
    reporter: Arc<RecordingReporter>,
) -> RunningWorker {
    start(QueueWorker::new(rx, state, processor, reporter).with_poll_interval(TEST_POLL))
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + GUARD;
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met within {GUARD:?}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn guarded<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(GUARD, future)
        .await
        .expect("operation finished within guard")
}

#[tokio::test]
async fn events_are_processed_once_each_in_enqueue_order() {
    let (state, rx) = QueueState::new();
    let ids: Vec<String> = (0..6).map(|i| format!("card{i}")).collect();
    for id in &ids {
        state.enqueue(event(id)).expect("enqueue");
    }

    let processor = Arc::new(ScriptedProcessor::new().with_delay(Duration::from_millis(5)));
    let reporter = Arc::new(RecordingReporter::default());
    let worker = launch(state.clone(), rx, processor.clone(), reporter.clone());

    wait_until(|| state.processed_count() == 6).await;
    assert_eq!(processor.started(), ids);
    assert_eq!(processor.peak_in_flight(), 1);
    assert_eq!(state.queue_size(), 0);

    assert!(matches!(guarded(worker.stop(GUARD)).await, StopOutcome::Stopped(_)));
}

#[tokio::test]
async fn a_failing_event_does_not_affect_its_neighbours() {
    let (state, rx) = QueueState::new();
    for id in ["X", "Y", "Z"] {
        state.enqueue(event(id)).expect("enqueue");
    }

    let processor = Arc::new(ScriptedProcessor::new().failing_on("Y"));
    let reporter = Arc::new(RecordingReporter::default());
    let worker = launch(state.clone(), rx, processor.clone(), reporter.clone());

    wait_until(|| state.processed_count() + state.failed_count() == 3).await;
    assert_eq!(processor.started(), ["X", "Y", "Z"]);
    assert_eq!(processor.write_backs(), ["X", "Z"]);
    assert_eq!(state.failed_count(), 1);

    let errors: Vec<String> = reporter
        .lines()
        .into_iter()
        .filter(|l| l.starts_with("❌ Webhook error"))
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Card Y"), "unexpected line: {}", errors[0]);
    assert!(state.is_running());

    guarded(worker.stop(GUARD)).await;
}

#[tokio::test]
async fn drained_line_is_emitted_once_per_empty_transition() {
    let (state, rx) = QueueState::new();
    for id in ["a", "b", "c"] {
        state.enqueue(event(id)).expect("enqueue");
    }

    let processor = Arc::new(ScriptedProcessor::new());
    let reporter = Arc::new(RecordingReporter::default());
    let worker = launch(state.clone(), rx, processor.clone(), reporter.clone());

    wait_until(|| state.processed_count() == 3).await;
    // Several idle polls pass without further lines.
    tokio::time::sleep(TEST_POLL * 5).await;
    assert_eq!(reporter.count_containing(DRAINED_LINE), 1);

    state.enqueue(event("d")).expect("enqueue");
    wait_until(|| state.processed_count() == 4).await;
    tokio::time::sleep(TEST_POLL * 2).await;
    assert_eq!(reporter.count_containing(DRAINED_LINE), 2);

    guarded(worker.stop(GUARD)).await;
}

#[tokio::test]
async fn stop_lets_the_current_event_finish_and_processes_nothing_after_it() {
    let (state, rx) = QueueState::new();
    state.enqueue(event("A")).expect("enqueue");
    state.enqueue(event("B")).expect("enqueue");

    let gate = Arc::new(Gate::default());
    let processor = Arc::new(ScriptedProcessor::new().with_gate(gate.clone()));
    let reporter = Arc::new(RecordingReporter::default());
    let worker = launch(state.clone(), rx, processor.clone(), reporter.clone());

    guarded(gate.entered.notified()).await;
    let stopping = tokio::spawn(worker.stop(GUARD));
    wait_until(|| !state.is_running()).await;
    gate.release.notify_one();

    let outcome = guarded(stopping).await.expect("stop task");
    assert_eq!(outcome, StopOutcome::Stopped(WorkerExit::StopFlag));
    assert_eq!(processor.started(), ["A"]);
    assert_eq!(processor.write_backs(), ["A"]);
    assert_eq!(state.queue_size(), 1);
    assert_eq!(reporter.count_containing(DRAINED_LINE), 0);
}

#[tokio::test]
async fn stopping_an_idle_worker_is_prompt() {
    let (state, rx) = QueueState::new();
    let processor = Arc::new(ScriptedProcessor::new());
    let reporter = Arc::new(RecordingReporter::default());
    let worker = launch(state.clone(), rx, processor, reporter);
    assert!(state.is_running());

    tokio::time::sleep(TEST_POLL / 2).await;
    let begun = Instant::now();
    let outcome = guarded(worker.stop(Duration::from_secs(2))).await;

    assert!(matches!(outcome, StopOutcome::Stopped(_)));
    assert!(begun.elapsed() < Duration::from_secs(1));
    assert!(!state.is_running());
    assert!(!state.status().processor_running);
}

#[tokio::test]
async fn enqueue_after_worker_exit_is_rejected() {
    let (state, rx) = QueueState::new();
    let worker = launch(
        state.clone(),
        rx,
        Arc::new(ScriptedProcessor::new()),
        Arc::new(RecordingReporter::default()),
    );
    guarded(worker.stop(GUARD)).await;

    assert!(matches!(state.enqueue(event("late")), Err(QueueError::Closed)));
}

#[tokio::test]
async fn a_panicking_processor_is_contained() {
    let (state, rx) = QueueState::new();
    state.enqueue(event("P")).expect("enqueue");
    state.enqueue(event("Q")).expect("enqueue");

    let processor = Arc::new(ScriptedProcessor::new().panicking_on("P"));
    let reporter = Arc::new(RecordingReporter::default());
    let worker = launch(state.clone(), rx, processor.clone(), reporter.clone());

    wait_until(|| state.processed_count() + state.failed_count() == 2).await;
    assert_eq!(state.failed_count(), 1);
    assert_eq!(processor.write_backs(), ["Q"]);
    assert_eq!(reporter.count_containing("panicked"), 1);
    assert!(state.is_running());

    assert!(matches!(guarded(worker.stop(GUARD)).await, StopOutcome::Stopped(_)));
}

#[tokio::test]
async fn stop_times_out_when_the_current_event_hangs() {
    let (state, rx) = QueueState::new();
    state.enqueue(event("slow")).expect("enqueue");

    let gate = Arc::new(Gate::default());
    let processor = Arc::new(ScriptedProcessor::new().with_gate(gate.clone()));
    let worker = launch(
        state.clone(),
        rx,
        processor.clone(),
        Arc::new(RecordingReporter::default()),
    );

    guarded(gate.entered.notified()).await;
    let outcome = guarded(worker.stop(Duration::from_millis(100))).await;

    assert_eq!(outcome, StopOutcome::TimedOut);
    assert!(!state.is_running());
    gate.release.notify_one();
}
