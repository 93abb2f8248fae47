//! Unbounded FIFO between the intake endpoint and the queue worker.
//!
//! Any number of [`EventQueue`] clones may enqueue concurrently; exactly one
//! [`QueueReceiver`] exists per queue, so there is exactly one consumer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use relay::QueuedEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// An element travelling through the queue.
#[derive(Debug)]
pub enum QueueItem {
    /// A real event to process.
    Event(Box<QueuedEvent>),
    /// Sentinel: the worker must exit without dequeuing anything else.
    Stop,
}

/// Outcome of one [`QueueReceiver::dequeue_blocking`] call.
#[derive(Debug)]
pub enum Dequeued {
    /// An item was available within the timeout.
    Item(QueueItem),
    /// Nothing arrived within the timeout. This is the normal idle condition.
    Idle,
    /// Every producer handle has been dropped; nothing can arrive any more.
    Closed,
}

/// Errors returned to producers.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The consumer has gone away; the item was not accepted.
    #[error("event queue is closed")]
    Closed,
}

/// Creates a connected producer/consumer pair.
pub fn event_queue() -> (EventQueue, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        EventQueue {
            tx,
            depth: Arc::clone(&depth),
        },
        QueueReceiver { rx, depth },
    )
}

/// Producer handle. Cheap to clone; never blocks.
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<QueueItem>,
    depth: Arc<AtomicUsize>,
}

impl EventQueue {
    /// Appends an event to the back of the queue.
    ///
    /// Fails only when the consumer has been dropped.
    pub fn enqueue(&self, event: QueuedEvent) -> Result<(), QueueError> {
        // Count before sending so a concurrent dequeue can never observe the
        // item without its increment.
        self.depth.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(QueueItem::Event(Box::new(event))).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueError::Closed);
        }
        Ok(())
    }

    /// Appends the stop sentinel. The sentinel is not counted in the depth.
    pub(crate) fn enqueue_stop(&self) -> Result<(), QueueError> {
        self.tx.send(QueueItem::Stop).map_err(|_| QueueError::Closed)
    }

    /// Number of events enqueued and not yet dequeued.
    ///
    /// Advisory: the value may be stale by the time the caller reads it.
    pub fn size(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

/// Consumer handle. Owned by the queue worker.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::UnboundedReceiver<QueueItem>,
    depth: Arc<AtomicUsize>,
}

impl QueueReceiver {
    /// Waits up to `timeout` for the next item.
    pub async fn dequeue_blocking(&mut self, timeout: Duration) -> Dequeued {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(item)) => {
                if matches!(item, QueueItem::Event(_)) {
                    self.depth.fetch_sub(1, Ordering::SeqCst);
                }
                Dequeued::Item(item)
            }
            Ok(None) => Dequeued::Closed,
            Err(_) => Dequeued::Idle,
        }
    }

    /// Number of events enqueued and not yet dequeued.
    pub fn size(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay::{EventType, RecordId};

    fn event(id: &str) -> QueuedEvent {
        QueuedEvent::new(
            EventType::RecordUpdated,
            RecordId::new(id).expect("non-empty"),
            None,
            None,
            serde_json::Value::Null,
        )
    }

    fn record_of(item: Dequeued) -> String {
        match item {
            Dequeued::Item(QueueItem::Event(e)) => e.record_id.to_string(),
            other => panic!("expected an event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn items_come_out_in_enqueue_order() {
        let (queue, mut rx) = event_queue();
        for id in ["a", "b", "c"] {
            queue.enqueue(event(id)).expect("enqueue");
        }
        assert_eq!(queue.size(), 3);

        let timeout = Duration::from_millis(50);
        assert_eq!(record_of(rx.dequeue_blocking(timeout).await), "a");
        assert_eq!(record_of(rx.dequeue_blocking(timeout).await), "b");
        assert_eq!(record_of(rx.dequeue_blocking(timeout).await), "c");
        assert_eq!(queue.size(), 0);
    }

    #[tokio::test]
    async fn empty_queue_times_out_as_idle() {
        let (_queue, mut rx) = event_queue();
        let got = rx.dequeue_blocking(Duration::from_millis(10)).await;
        assert!(matches!(got, Dequeued::Idle));
    }

    #[tokio::test]
    async fn sentinel_is_not_counted_in_depth() {
        let (queue, mut rx) = event_queue();
        queue.enqueue_stop().expect("enqueue stop");
        assert_eq!(queue.size(), 0);
        let got = rx.dequeue_blocking(Duration::from_millis(10)).await;
        assert!(matches!(got, Dequeued::Item(QueueItem::Stop)));
        assert_eq!(rx.size(), 0);
    }

    #[test]
    fn enqueue_after_consumer_dropped_fails_and_keeps_depth() {
        let (queue, rx) = event_queue();
        drop(rx);
        assert!(matches!(queue.enqueue(event("x")), Err(QueueError::Closed)));
        assert_eq!(queue.size(), 0);
    }

    #[tokio::test]
    async fn dropping_all_producers_closes_the_queue() {
        let (queue, mut rx) = event_queue();
        drop(queue);
        let got = rx.dequeue_blocking(Duration::from_millis(10)).await;
        assert!(matches!(got, Dequeued::Closed));
    }
}
