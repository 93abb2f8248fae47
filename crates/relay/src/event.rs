//! Inbound board events as they travel through the intake queue.

use serde::{Deserialize, Serialize};

use crate::{EventId, RecordId, Timestamp};

/// The kinds of board action this system reacts to.
///
/// Every other action type is ignored at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A comment was posted on a card (`commentCard`).
    CommentAdded,
    /// A card's fields were changed (`updateCard`).
    RecordUpdated,
}

impl EventType {
    /// Maps a board action type string onto a recognised event type.
    ///
    /// Returns `None` for every action type outside the allow-list.
    pub fn from_action_type(action_type: &str) -> Option<Self> {
        match action_type {
            "commentCard" => Some(Self::CommentAdded),
            "updateCard" => Some(Self::RecordUpdated),
            _ => None,
        }
    }

    /// Returns the board action type string this event type was parsed from.
    pub fn as_action_type(self) -> &'static str {
        match self {
            Self::CommentAdded => "commentCard",
            Self::RecordUpdated => "updateCard",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_action_type())
    }
}

/// An immutable snapshot of one accepted webhook delivery.
///
/// Captured at intake so that nothing done to the originating request after
/// the handler returns can affect processing. Ownership moves from the intake
/// handler into the queue and from the queue into the worker; the event is
/// dropped once processing finishes, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEvent {
    /// Correlation identifier assigned at intake.
    pub event_id: EventId,
    /// Recognised action type.
    pub event_type: EventType,
    /// The card the action refers to.
    pub record_id: RecordId,
    /// Card name as reported in the payload. For logging only; the processor
    /// always re-fetches the record.
    pub record_name_hint: Option<String>,
    /// Comment body. Present only for [`EventType::CommentAdded`].
    pub comment_text: Option<String>,
    /// The raw `action` object, passed through untouched.
    pub payload: serde_json::Value,
    /// When the delivery was accepted.
    pub received_at: Timestamp,
}

impl QueuedEvent {
    /// Creates an event snapshot stamped with a fresh id and the current time.
    ///
    /// `comment_text` is discarded unless `event_type` is
    /// [`EventType::CommentAdded`].
    pub fn new(
        event_type: EventType,
        record_id: RecordId,
        record_name_hint: Option<String>,
        comment_text: Option<String>,
        payload: serde_json::Value,
    ) -> Self {
        let comment_text = match event_type {
            EventType::CommentAdded => comment_text,
            EventType::RecordUpdated => None,
        };
        Self {
            event_id: EventId::new_random(),
            event_type,
            record_id,
            record_name_hint,
            comment_text,
            payload,
            received_at: Timestamp::now(),
        }
    }

    /// Name to use in log lines: the payload hint if present, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.record_name_hint
            .as_deref()
            .unwrap_or_else(|| self.record_id.as_str())
    }
}
