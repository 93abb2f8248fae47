//! HTTP-level behaviour of the intake router.

mod common;

use std::error::Error;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use listener::{router, QueueState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn post_webhook(payload: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("valid request")
}

fn comment(card: &str, text: &str) -> Value {
    json!({
        "action": {
            "type": "commentCard",
            "data": { "card": { "id": card, "name": "Implement Boss Loot Chest Logic" }, "text": text }
        }
    })
}

#[tokio::test]
async fn head_ping_does_not_touch_the_queue() -> Result<(), Box<dyn Error>> {
    let (state, _rx) = QueueState::new();
    for i in 0..5 {
        state.enqueue(common::event(&format!("pre{i}")))?;
    }

    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method(Method::HEAD)
                .uri("/webhook")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.queue_size(), 5);
    Ok(())
}

#[tokio::test]
async fn accepted_comment_is_enqueued() -> Result<(), Box<dyn Error>> {
    let (state, _rx) = QueueState::new();

    let response = router(state.clone())
        .oneshot(post_webhook(comment("abc123", "What should drop?")))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.queue_size(), 1);
    Ok(())
}

#[tokio::test]
async fn unrecognised_action_is_acknowledged_but_not_enqueued() -> Result<(), Box<dyn Error>> {
    let (state, _rx) = QueueState::new();

    let response = router(state.clone())
        .oneshot(post_webhook(json!({
            "action": { "type": "createCard", "data": { "card": { "id": "abc123" } } }
        })))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.queue_size(), 0);
    Ok(())
}

#[tokio::test]
async fn own_reply_is_not_enqueued() -> Result<(), Box<dyn Error>> {
    let (state, _rx) = QueueState::new();

    let response = router(state.clone())
        .oneshot(post_webhook(comment("abc123", "[🤖 AI Reply]\nConsider a rarity table.")))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.queue_size(), 0);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_acknowledged() -> Result<(), Box<dyn Error>> {
    let (state, _rx) = QueueState::new();

    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/webhook")
                .body(Body::from("definitely not json"))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.queue_size(), 0);
    Ok(())
}

#[tokio::test]
async fn enqueue_failure_returns_server_error() -> Result<(), Box<dyn Error>> {
    let (state, rx) = QueueState::new();
    drop(rx);

    let response = router(state.clone())
        .oneshot(post_webhook(comment("abc123", "Anyone there?")))
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.queue_size(), 0);
    Ok(())
}

#[tokio::test]
async fn status_endpoint_reports_depth_and_running_flag() -> Result<(), Box<dyn Error>> {
    let (state, _rx) = QueueState::new();
    state.enqueue(common::event("a"))?;
    state.enqueue(common::event("b"))?;

    let response = router(state.clone())
        .oneshot(Request::builder().uri("/queue/status").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let status: Value = serde_json::from_slice(&body)?;
    assert_eq!(status["queue_size"], 2);
    assert_eq!(status["processor_running"], false);
    assert!(status["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}
