//! Trello REST client.

use std::time::Duration;

use async_trait::async_trait;
use relay::{
    paginate_comment, BoardAdmin, BoardId, BoardLabel, BoardList, LabelName, ListId, Record,
    RecordId, RecordStore, RecordStoreError, Webhook, WebhookId, DEFAULT_COMMENT_LIMIT,
};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::TrelloError;
use crate::labels::LabelMap;
use crate::wire::{CardDto, LabelDto, ListDto, WebhookDto};

/// Production API root.
pub const TRELLO_API_BASE: &str = "https://api.trello.com";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for [`TrelloClient`].
#[derive(Debug, Clone)]
pub struct TrelloConfig {
    pub api_base: String,
    pub key: String,
    pub token: String,
    /// Required for the board-level [`BoardAdmin`] calls only.
    pub board_id: Option<BoardId>,
    pub comment_limit: usize,
    pub request_timeout: Duration,
}

impl TrelloConfig {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: TRELLO_API_BASE.to_string(),
            key: key.into(),
            token: token.into(),
            board_id: None,
            comment_limit: DEFAULT_COMMENT_LIMIT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// [`RecordStore`] and [`BoardAdmin`] over the Trello REST API.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    config: TrelloConfig,
    labels: LabelMap,
}

impl TrelloClient {
    pub fn new(config: TrelloConfig, labels: LabelMap) -> Result<Self, TrelloError> {
        if config.key.is_empty() || config.token.is_empty() {
            return Err(TrelloError::Configuration {
                message: "TRELLO_KEY and TRELLO_TOKEN must be set".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(TrelloError::Client)?;
        Ok(Self {
            http,
            config,
            labels,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/1/{path}", self.config.api_base.trim_end_matches('/'))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("key", &self.config.key), ("token", &self.config.token)])
    }

    fn board(&self) -> Result<&BoardId, RecordStoreError> {
        self.config
            .board_id
            .as_ref()
            .ok_or_else(|| RecordStoreError::Configuration {
                message: "TRELLO_BOARD_ID must be set".to_string(),
            })
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, RecordStoreError> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|err| transport(operation, &err))?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(status_error(operation, response).await)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RecordStoreError> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| RecordStoreError::Malformed {
                operation,
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl RecordStore for TrelloClient {
    async fn fetch_record(&self, id: &RecordId) -> Result<Record, RecordStoreError> {
        let request = self
            .http
            .get(self.url(&format!("cards/{id}")))
            .query(&[("fields", "name,desc,url,idList")]);
        match self.send_json::<CardDto>("fetch_record", request).await {
            Err(RecordStoreError::Status { status: 404, .. }) => {
                Err(RecordStoreError::NotFound { id: id.to_string() })
            }
            other => other.map(Record::from),
        }
    }

    async fn update_description(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError> {
        let request = self
            .http
            .put(self.url(&format!("cards/{id}")))
            .form(&[("desc", text)]);
        self.send("update_description", request).await?;
        tracing::debug!(record_id = %id, "Card description updated");
        Ok(())
    }

    async fn add_comment(&self, id: &RecordId, text: &str) -> Result<(), RecordStoreError> {
        let parts = paginate_comment(text, self.config.comment_limit);
        let total = parts.len();
        for (index, part) in parts.iter().enumerate() {
            let request = self
                .http
                .post(self.url(&format!("cards/{id}/actions/comments")))
                .query(&[("text", part.as_str())]);
            self.send("add_comment", request).await?;
            tracing::debug!(record_id = %id, part = index + 1, total, "Comment posted");
        }
        Ok(())
    }

    async fn set_labels(&self, id: &RecordId, labels: &[LabelName]) -> Result<(), RecordStoreError> {
        for name in labels {
            let Some(label_id) = self.labels.get(name) else {
                tracing::warn!(record_id = %id, label = %name, "Unknown label name; skipped");
                continue;
            };
            let request = self
                .http
                .post(self.url(&format!("cards/{id}/idLabels")))
                .query(&[("value", label_id.as_str())]);
            match self.send("set_labels", request).await {
                Ok(_) => tracing::debug!(record_id = %id, label = %name, "Label applied"),
                Err(RecordStoreError::Status { status, body, .. }) => {
                    tracing::warn!(record_id = %id, label = %name, status, %body, "Failed to apply label");
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BoardAdmin for TrelloClient {
    async fn board_labels(&self) -> Result<Vec<BoardLabel>, RecordStoreError> {
        let request = self
            .http
            .get(self.url(&format!("boards/{}/labels", self.board()?)))
            .query(&[("limit", "1000")]);
        let labels: Vec<LabelDto> = self.send_json("board_labels", request).await?;
        Ok(labels.into_iter().map(BoardLabel::from).collect())
    }

    async fn board_lists(&self) -> Result<Vec<BoardList>, RecordStoreError> {
        let request = self
            .http
            .get(self.url(&format!("boards/{}/lists", self.board()?)));
        let lists: Vec<ListDto> = self.send_json("board_lists", request).await?;
        Ok(lists.into_iter().map(BoardList::from).collect())
    }

    async fn list_records(&self, list: &ListId) -> Result<Vec<Record>, RecordStoreError> {
        let request = self.http.get(self.url(&format!("lists/{list}/cards")));
        let cards: Vec<CardDto> = self.send_json("list_records", request).await?;
        Ok(cards.into_iter().map(Record::from).collect())
    }

    async fn webhooks(&self) -> Result<Vec<Webhook>, RecordStoreError> {
        let request = self
            .http
            .get(self.url(&format!("tokens/{}/webhooks", self.config.token)));
        let hooks: Vec<WebhookDto> = self.send_json("webhooks", request).await?;
        Ok(hooks.into_iter().map(Webhook::from).collect())
    }

    async fn register_webhook(
        &self,
        model_id: &str,
        callback_url: &str,
        description: &str,
    ) -> Result<Webhook, RecordStoreError> {
        let request = self.http.post(self.url("webhooks/")).form(&[
            ("callbackURL", callback_url),
            ("idModel", model_id),
            ("description", description),
        ]);
        let hook: WebhookDto = self.send_json("register_webhook", request).await?;
        tracing::info!(webhook_id = %hook.id, model_id, callback_url, "Webhook registered");
        Ok(hook.into())
    }

    async fn delete_webhook(&self, id: &WebhookId) -> Result<(), RecordStoreError> {
        let request = self.http.delete(self.url(&format!("webhooks/{id}")));
        self.send("delete_webhook", request).await?;
        tracing::info!(webhook_id = %id, "Webhook deleted");
        Ok(())
    }
}

fn transport(operation: &'static str, err: &reqwest::Error) -> RecordStoreError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    RecordStoreError::Transport { operation, message }
}

async fn status_error(operation: &'static str, response: Response) -> RecordStoreError {
    let status = response.status();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    if status == StatusCode::UNAUTHORIZED {
        tracing::error!(operation, "Trello rejected the API key or token");
    }
    RecordStoreError::Status {
        operation,
        status: status.as_u16(),
        body,
    }
}
