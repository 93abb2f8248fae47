//! File-backed stand-in for the Trello API.
//!
//! Enabled with `MOCK_TRELLO=true`. Cards are read from JSON files in the
//! mock data directory; writes are logged and recorded but never sent
//! anywhere, so the whole pipeline can run without network access to Trello.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use relay::{
    BoardAdmin, BoardLabel, BoardList, LabelName, ListId, Record, RecordId, RecordStore,
    RecordStoreError, Webhook, WebhookId,
};
use serde::de::DeserializeOwned;

use crate::errors::TrelloError;
use crate::wire::CardDto;

/// Default directory holding the mock data files.
pub const DEFAULT_MOCK_DATA_DIR: &str = "mock_data";

const LIST_CARDS_FILE: &str = "mock_list_cards.json";

/// Card ids served in mock mode and the files that hold them.
pub const MOCK_RECORDS: &[(&str, &str)] = &[
    ("abc123", "mock_card_dungeon.json"),
    ("def456", "mock_card_battle.json"),
    ("ghi789", "mock_card_trade_ui.json"),
];

/// A write the mock board accepted instead of sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockWrite {
    Description { record_id: RecordId, text: String },
    Comment { record_id: RecordId, text: String },
    Labels { record_id: RecordId, labels: Vec<LabelName> },
}

#[derive(Debug)]
pub struct MockBoard {
    data_dir: PathBuf,
    writes: Mutex<Vec<MockWrite>>,
}

impl MockBoard {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Writes accepted so far, oldest first.
    pub fn writes(&self) -> Vec<MockWrite> {
        self.writes
            .lock()
            .map(|w| w.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn record(&self, write: MockWrite) {
        tracing::info!(?write, "Mock Trello write (not sent)");
        match self.writes.lock() {
            Ok(mut writes) => writes.push(write),
            Err(poisoned) => poisoned.into_inner().push(write),
        }
    }

    fn unsupported(operation: &str) -> RecordStoreError {
        RecordStoreError::Configuration {
            message: format!("{operation} is not available in mock mode"),
        }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TrelloError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TrelloError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| TrelloError::Format {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl RecordStore for MockBoard {
    async fn fetch_record(&self, id: &RecordId) -> Result<Record, RecordStoreError> {
        let file = MOCK_RECORDS
            .iter()
            .find(|(known, _)| *known == id.as_str())
            .map(|(_, file)| *file)
            .ok_or_else(|| TrelloError::UnknownMockRecord { id: id.to_string() })?;
        let card: CardDto = read_json(&self.data_dir.join(file)).await?;
        Ok(card.into())
    }

    async fn update_description(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError> {
        self.record(MockWrite::Description {
            record_id: id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn add_comment(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError> {
        self.record(MockWrite::Comment {
            record_id: id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn set_labels(&self, id: &RecordId, labels: &[LabelName]) -> Result<(), RecordStoreError> {
        self.record(MockWrite::Labels {
            record_id: id.clone(),
            labels: labels.to_vec(),
        });
        Ok(())
    }
}

#[async_trait]
impl BoardAdmin for MockBoard {
    async fn board_labels(&self) -> Result<Vec<BoardLabel>, RecordStoreError> {
        Err(Self::unsupported("board_labels"))
    }

    async fn board_lists(&self) -> Result<Vec<BoardList>, RecordStoreError> {
        Err(Self::unsupported("board_lists"))
    }

    /// Every list serves the same canned cards.
    async fn list_records(&self, _list: &ListId) -> Result<Vec<Record>, RecordStoreError> {
        let cards: Vec<CardDto> = read_json(&self.data_dir.join(LIST_CARDS_FILE)).await?;
        Ok(cards.into_iter().map(Record::from).collect())
    }

    async fn webhooks(&self) -> Result<Vec<Webhook>, RecordStoreError> {
        Err(Self::unsupported("webhooks"))
    }

    async fn register_webhook(
        &self,
        _model_id: &str,
        _callback_url: &str,
        _description: &str,
    ) -> Result<Webhook, RecordStoreError> {
        Err(Self::unsupported("register_webhook"))
    }

    async fn delete_webhook(&self, _id: &WebhookId) -> Result<(), RecordStoreError> {
        Err(Self::unsupported("delete_webhook"))
    }
}
