#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay::{
    BoardAdmin, BoardLabel, BoardList, EventType, LabelName, ListId, LlmError, LlmProvider,
    ModelName, QueuedEvent, Record, RecordId, RecordStore, RecordStoreError, StatusReporter,
    Webhook, WebhookId,
};

pub fn record(id: &str, name: &str, description: &str) -> Record {
    Record {
        id: RecordId::new(id).expect("non-empty"),
        name: name.to_string(),
        description: description.to_string(),
        url: format!("https://trello.com/c/{id}"),
        list_id: None,
    }
}

pub fn comment_event(id: &str, text: &str) -> QueuedEvent {
    QueuedEvent::new(
        EventType::CommentAdded,
        RecordId::new(id).expect("non-empty"),
        None,
        Some(text.to_string()),
        serde_json::Value::Null,
    )
}

pub fn update_event(id: &str) -> QueuedEvent {
    QueuedEvent::new(
        EventType::RecordUpdated,
        RecordId::new(id).expect("non-empty"),
        None,
        None,
        serde_json::Value::Null,
    )
}

/// A board write observed by [`FakeBoard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Description { id: String, text: String },
    Comment { id: String, text: String },
    Labels { id: String, names: Vec<String> },
}

/// In-memory board implementing both board ports.
#[derive(Default)]
pub struct FakeBoard {
    records: Mutex<HashMap<String, Record>>,
    lists: HashMap<String, Vec<String>>,
    writes: Mutex<Vec<Write>>,
    fetches: Mutex<Vec<String>>,
    fail_comment_on: HashSet<String>,
}

impl FakeBoard {
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let board = Self::default();
        {
            let mut map = board.records.lock().expect("lock");
            for r in records {
                map.insert(r.id.to_string(), r);
            }
        }
        board
    }

    pub fn with_list(mut self, list: &str, record_ids: &[&str]) -> Self {
        self.lists.insert(
            list.to_string(),
            record_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn failing_comments_on(mut self, id: &str) -> Self {
        self.fail_comment_on.insert(id.to_string());
        self
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().expect("lock").clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().expect("lock").clone()
    }

    pub fn description_of(&self, id: &str) -> Option<String> {
        self.records
            .lock()
            .expect("lock")
            .get(id)
            .map(|r| r.description.clone())
    }
}

#[async_trait]
impl RecordStore for FakeBoard {
    async fn fetch_record(&self, id: &RecordId) -> Result<Record, RecordStoreError> {
        self.fetches.lock().expect("lock").push(id.to_string());
        self.records
            .lock()
            .expect("lock")
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| RecordStoreError::NotFound { id: id.to_string() })
    }

    async fn update_description(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError> {
        if let Some(r) = self.records.lock().expect("lock").get_mut(id.as_str()) {
            r.description = text.to_string();
        }
        self.writes.lock().expect("lock").push(Write::Description {
            id: id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn add_comment(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError> {
        if self.fail_comment_on.contains(id.as_str()) {
            return Err(RecordStoreError::Status {
                operation: "add_comment",
                status: 401,
                body: "invalid token".into(),
            });
        }
        self.writes.lock().expect("lock").push(Write::Comment {
            id: id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn set_labels(&self, id: &RecordId, labels: &[LabelName]) -> Result<(), RecordStoreError> {
        self.writes.lock().expect("lock").push(Write::Labels {
            id: id.to_string(),
            names: labels.iter().map(|l| l.to_string()).collect(),
        });
        Ok(())
    }
}

#[async_trait]
impl BoardAdmin for FakeBoard {
    async fn board_labels(&self) -> Result<Vec<BoardLabel>, RecordStoreError> {
        Ok(Vec::new())
    }

    async fn board_lists(&self) -> Result<Vec<BoardList>, RecordStoreError> {
        Ok(Vec::new())
    }

    async fn list_records(&self, list: &ListId) -> Result<Vec<Record>, RecordStoreError> {
        let Some(ids) = self.lists.get(list.as_str()) else {
            return Err(RecordStoreError::Status {
                operation: "list_records",
                status: 404,
                body: "list not found".into(),
            });
        };
        let records = self.records.lock().expect("lock");
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn webhooks(&self) -> Result<Vec<Webhook>, RecordStoreError> {
        Ok(Vec::new())
    }

    async fn register_webhook(
        &self,
        model_id: &str,
        callback_url: &str,
        description: &str,
    ) -> Result<Webhook, RecordStoreError> {
        Ok(Webhook {
            id: WebhookId::new("wh1").expect("non-empty"),
            model_id: model_id.to_string(),
            callback_url: callback_url.to_string(),
            description: Some(description.to_string()),
        })
    }

    async fn delete_webhook(&self, _id: &WebhookId) -> Result<(), RecordStoreError> {
        Ok(())
    }
}

/// Language model that answers by prompt kind and records every prompt.
pub struct ScriptedLlm {
    model: ModelName,
    pub metadata: String,
    pub advice: String,
    pub summary: String,
    failing_models: HashSet<String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            model: ModelName::new("llama3").expect("non-empty"),
            metadata: "[Context]\nGameSystem: Settlement Mode\nMode: Dungeon\nSubsystem: Loot/Combat AI"
                .to_string(),
            advice: "Spawn the chest from the boss death event.".to_string(),
            summary: "Chest spawning is half done.".to_string(),
            failing_models: HashSet::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(mut self, model: &str) -> Self {
        self.failing_models.insert(model.to_string());
        self
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn model(&self) -> &ModelName {
        &self.model
    }

    async fn complete_with_model(&self, model: &ModelName, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .expect("lock")
            .push((model.to_string(), prompt.to_string()));
        if self.failing_models.contains(model.as_str()) {
            return Err(LlmError::Transport {
                message: "connection refused".into(),
            });
        }
        let answer = if prompt.contains("without metadata") {
            &self.metadata
        } else if prompt.contains("stand-up") {
            &self.summary
        } else {
            &self.advice
        };
        Ok(answer.clone())
    }
}

/// Status reporter that keeps every line.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock").clone()
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn log(&self, line: &str) {
        self.lines.lock().expect("lock").push(line.to_string());
    }
}
