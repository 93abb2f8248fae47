#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use relay::{
    EventProcessor, EventType, QueuedEvent, RecordId, RecordStoreError, RelayError,
    StatusReporter,
};
use tokio::sync::Notify;

/// Poll interval used by tests so idle loops stay fast.
pub const TEST_POLL: Duration = Duration::from_millis(50);

pub fn event(record: &str) -> QueuedEvent {
    QueuedEvent::new(
        EventType::RecordUpdated,
        RecordId::new(record).expect("non-empty record id"),
        Some(format!("Card {record}")),
        None,
        serde_json::Value::Null,
    )
}

/// Status reporter that keeps every line.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("reporter lock").clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn log(&self, line: &str) {
        self.lines.lock().expect("reporter lock").push(line.to_string());
    }
}

/// Event processor that records the order of invocations, the peak number
/// of concurrent invocations, and a "write-back" per successful event.
#[derive(Default)]
pub struct ScriptedProcessor {
    started: Mutex<Vec<String>>,
    write_backs: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    fail_on: HashSet<String>,
    panic_on: HashSet<String>,
    delay: Duration,
    gate: Option<Arc<Gate>>,
}

/// Holds the processor inside `process` until released.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl ScriptedProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, record: &str) -> Self {
        self.fail_on.insert(record.to_string());
        self
    }

    pub fn panicking_on(mut self, record: &str) -> Self {
        self.panic_on.insert(record.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().expect("processor lock").clone()
    }

    pub fn write_backs(&self) -> Vec<String> {
        self.write_backs.lock().expect("processor lock").clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventProcessor for ScriptedProcessor {
    async fn process(&self, event: &QueuedEvent) -> Result<(), RelayError> {
        let record = event.record_id.to_string();
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.started
            .lock()
            .expect("processor lock")
            .push(record.clone());

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(&record) {
            panic!("scripted panic on {record}");
        }
        if self.fail_on.contains(&record) {
            return Err(RecordStoreError::NotFound { id: record }.into());
        }
        self.write_backs
            .lock()
            .expect("processor lock")
            .push(record);
        Ok(())
    }
}
