//! HTTP intake endpoint.
//!
//! `HEAD /webhook` answers the board provider's validation ping.
//! `POST /webhook` filters the delivery, enqueues accepted events, and
//! returns as soon as the enqueue call returns. `GET /queue/status` reports
//! queue depth.
//!
//! The caller only ever sees `200` (accepted or ignored) or `500` (could not
//! accept). Processing outcomes are never reflected in the response.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use relay::{is_own_reply, EventType, QueuedEvent, RecordId};
use serde_json::Value;

use crate::state::{QueueState, QueueStatus};

/// Why a delivery was not enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The body is not a JSON object with an `action`.
    Malformed,
    /// The action type is outside the allow-list.
    UnrecognisedType(String),
    /// A comment that carries our own reply marker.
    OwnReply,
    /// A recognised action that does not name a card.
    MissingRecordId,
}

/// Result of filtering one delivery.
#[derive(Debug)]
pub enum IntakeDecision {
    /// The delivery passed filtering; enqueue this snapshot.
    Accept(QueuedEvent),
    /// Respond success without enqueueing.
    Ignore(IgnoreReason),
}

/// Filters a raw webhook body and snapshots accepted deliveries.
///
/// Expected shape:
/// `{ "action": { "type": "...", "data": { "card": { "id", "name"? }, "text"? } } }`.
pub fn classify(body: &[u8]) -> IntakeDecision {
    let Ok(payload) = serde_json::from_slice::<Value>(body) else {
        return IntakeDecision::Ignore(IgnoreReason::Malformed);
    };
    let Some(action) = payload.get("action").filter(|a| a.is_object()) else {
        return IntakeDecision::Ignore(IgnoreReason::Malformed);
    };

    let action_type = action.get("type").and_then(Value::as_str).unwrap_or_default();
    let Some(event_type) = EventType::from_action_type(action_type) else {
        return IntakeDecision::Ignore(IgnoreReason::UnrecognisedType(action_type.to_string()));
    };

    let data = action.get("data");
    let comment_text = data
        .and_then(|d| d.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if event_type == EventType::CommentAdded && comment_text.as_deref().is_some_and(is_own_reply)
    {
        return IntakeDecision::Ignore(IgnoreReason::OwnReply);
    }

    let card = data.and_then(|d| d.get("card"));
    let Some(record_id) = card
        .and_then(|c| c.get("id"))
        .and_then(Value::as_str)
        .and_then(RecordId::new)
    else {
        return IntakeDecision::Ignore(IgnoreReason::MissingRecordId);
    };
    let name_hint = card
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    IntakeDecision::Accept(QueuedEvent::new(
        event_type,
        record_id,
        name_hint,
        comment_text,
        action.clone(),
    ))
}

/// Builds the intake router over the shared queue state.
pub fn router(state: Arc<QueueState>) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook).head(validate_webhook))
        .route("/queue/status", get(queue_status))
        .with_state(state)
}

/// Validation ping from the board provider. Never touches the queue.
async fn validate_webhook() -> StatusCode {
    StatusCode::OK
}

async fn receive_webhook(State(state): State<Arc<QueueState>>, body: Bytes) -> StatusCode {
    match classify(&body) {
        IntakeDecision::Ignore(IgnoreReason::OwnReply) => {
            tracing::info!("Skipped AI-generated comment to avoid loop");
            StatusCode::OK
        }
        IntakeDecision::Ignore(reason) => {
            tracing::debug!(?reason, "Webhook ignored");
            StatusCode::OK
        }
        IntakeDecision::Accept(event) => {
            let event_id = event.event_id;
            let record_id = event.record_id.clone();
            let event_type = event.event_type;
            match state.enqueue(event) {
                Ok(()) => {
                    tracing::info!(
                        %event_id,
                        %record_id,
                        %event_type,
                        queue_size = state.queue_size(),
                        "Webhook event queued"
                    );
                    StatusCode::OK
                }
                Err(err) => {
                    tracing::error!(%event_id, %record_id, error = %err, "Failed to queue webhook event");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }
}

async fn queue_status(State(state): State<Arc<QueueState>>) -> Json<QueueStatus> {
    Json(state.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).expect("serialize")
    }

    fn accepted(decision: IntakeDecision) -> QueuedEvent {
        match decision {
            IntakeDecision::Accept(event) => event,
            IntakeDecision::Ignore(reason) => panic!("expected acceptance, got {reason:?}"),
        }
    }

    #[test]
    fn comment_event_is_snapshotted() {
        let event = accepted(classify(&body(json!({
            "action": {
                "type": "commentCard",
                "data": {
                    "card": { "id": "abc123", "name": "Implement Boss Loot Chest Logic" },
                    "text": "Should the loot include special follower-only items?"
                }
            }
        }))));

        assert_eq!(event.event_type, EventType::CommentAdded);
        assert_eq!(event.record_id.as_str(), "abc123");
        assert_eq!(
            event.record_name_hint.as_deref(),
            Some("Implement Boss Loot Chest Logic")
        );
        assert_eq!(
            event.comment_text.as_deref(),
            Some("Should the loot include special follower-only items?")
        );
        assert_eq!(event.payload["type"], "commentCard");
    }

    #[test]
    fn update_event_without_name_is_accepted() {
        let event = accepted(classify(&body(json!({
            "action": { "type": "updateCard", "data": { "card": { "id": "def456" } } }
        }))));
        assert_eq!(event.event_type, EventType::RecordUpdated);
        assert_eq!(event.record_name_hint, None);
    }

    #[test]
    fn own_reply_is_ignored_whatever_surrounds_it() {
        for text in [
            "[🤖 AI Reply]",
            "[🤖 AI Reply]\nDo the thing",
            "prefix [🤖 AI Reply] suffix",
            "[🤖 AI Reply] [Part 2/3]\nmore",
        ] {
            let decision = classify(&body(json!({
                "action": { "type": "commentCard", "data": { "card": { "id": "a" }, "text": text } }
            })));
            assert!(
                matches!(decision, IntakeDecision::Ignore(IgnoreReason::OwnReply)),
                "text {text:?} was not ignored"
            );
        }
    }

    #[test]
    fn marker_in_update_event_does_not_block_it() {
        let decision = classify(&body(json!({
            "action": { "type": "updateCard", "data": { "card": { "id": "a" }, "text": "[🤖 AI Reply]" } }
        })));
        assert!(matches!(decision, IntakeDecision::Accept(_)));
    }

    #[test]
    fn unrecognised_and_malformed_deliveries_are_ignored() {
        assert!(matches!(
            classify(&body(json!({ "action": { "type": "createCard" } }))),
            IntakeDecision::Ignore(IgnoreReason::UnrecognisedType(t)) if t == "createCard"
        ));
        assert!(matches!(
            classify(b"not json"),
            IntakeDecision::Ignore(IgnoreReason::Malformed)
        ));
        assert!(matches!(
            classify(&body(json!({ "model": {} }))),
            IntakeDecision::Ignore(IgnoreReason::Malformed)
        ));
        assert!(matches!(
            classify(&body(json!({ "action": { "type": "updateCard", "data": { "card": { "id": "" } } } }))),
            IntakeDecision::Ignore(IgnoreReason::MissingRecordId)
        ));
    }
}
