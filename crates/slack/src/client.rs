//! Minimal Slack Web API client: `chat.postMessage` only.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Slack is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Slack transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Slack returned HTTP {0}")]
    Status(u16),

    /// Slack answers HTTP 200 with `ok: false` for API-level failures.
    #[error("Slack API error: {0}")]
    Api(String),

    #[error("Malformed Slack response: {0}")]
    Malformed(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Result<Self, SlackError> {
        Self::with_api_base(token, SLACK_API_BASE)
    }

    pub fn with_api_base(
        token: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, SlackError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SlackError::NotConfigured("SLACK_BOT_TOKEN is empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SlackError::Transport)?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            token,
        })
    }

    /// Posts `text` to `channel`.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let url = format!("{}/chat.postMessage", self.api_base.trim_end_matches('/'));
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&PostMessage { channel, text })
            .send()
            .await
            .map_err(SlackError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlackError::Status(status.as_u16()));
        }
        let body: ApiResponse = response.json().await.map_err(SlackError::Malformed)?;
        if body.ok {
            Ok(())
        } else {
            Err(SlackError::Api(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
