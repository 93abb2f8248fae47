//! Port traits implemented by infrastructure crates.
//!
//! The queue worker and the event processor only ever see these traits;
//! concrete adapters (`trello`, `llm`, `slack`) are injected by the CLI
//! composition root. All traits are object safe so they can be held as
//! `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::{
    BoardLabel, BoardList, LabelName, ListId, LlmError, ModelName, QueuedEvent, Record,
    RecordId, RecordStoreError, RelayError, Webhook, WebhookId,
};

/// Read and write access to task records on the board.
///
/// Implementations are not required to be reentrant-safe across calls for the
/// same record: the queue worker guarantees that board-mutating calls are
/// issued from a single task, one event at a time.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches the current state of a record.
    async fn fetch_record(&self, id: &RecordId) -> Result<Record, RecordStoreError>;

    /// Replaces the record's description.
    async fn update_description(&self, id: &RecordId, text: &str)
        -> Result<(), RecordStoreError>;

    /// Posts a comment on the record.
    ///
    /// Text longer than the provider's comment limit is posted as several
    /// sequential comments (see [`crate::paginate_comment`]).
    async fn add_comment(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError>;

    /// Applies labels by human-readable name.
    ///
    /// Names with no known provider-side label are skipped.
    async fn set_labels(&self, id: &RecordId, labels: &[LabelName])
        -> Result<(), RecordStoreError>;
}

/// Board-level administration used by the maintenance commands.
#[async_trait]
pub trait BoardAdmin: Send + Sync {
    /// All label definitions on the board.
    async fn board_labels(&self) -> Result<Vec<BoardLabel>, RecordStoreError>;

    /// All lists on the board.
    async fn board_lists(&self) -> Result<Vec<BoardList>, RecordStoreError>;

    /// All records currently in `list`.
    async fn list_records(&self, list: &ListId) -> Result<Vec<Record>, RecordStoreError>;

    /// Webhooks registered for the configured token.
    async fn webhooks(&self) -> Result<Vec<Webhook>, RecordStoreError>;

    /// Registers a webhook that delivers changes to `model_id` to `callback_url`.
    async fn register_webhook(
        &self,
        model_id: &str,
        callback_url: &str,
        description: &str,
    ) -> Result<Webhook, RecordStoreError>;

    /// Removes a webhook registration.
    async fn delete_webhook(&self, id: &WebhookId) -> Result<(), RecordStoreError>;
}

/// A text-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// The model used by [`LlmProvider::complete`].
    fn model(&self) -> &ModelName;

    /// Completes `prompt` with an explicitly chosen model.
    ///
    /// Each call is bounded by a timeout owned by the provider.
    async fn complete_with_model(&self, model: &ModelName, prompt: &str)
        -> Result<String, LlmError>;

    /// Completes `prompt` with the configured model.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.complete_with_model(self.model(), prompt).await
    }
}

/// Best-effort, human-facing progress channel.
///
/// `log` never fails from the caller's point of view: implementations swallow
/// their own transport errors and fall back to local output.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Emits one status line.
    async fn log(&self, line: &str);
}

/// Performs the full processing pipeline for one dequeued event.
///
/// Invoked only by the queue worker, strictly one event at a time.
#[async_trait]
pub trait EventProcessor: Send + Sync {
    /// Processes `event` to completion.
    async fn process(&self, event: &QueuedEvent) -> Result<(), RelayError>;
}
