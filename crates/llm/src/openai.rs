//! Hosted models behind the OpenAI chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use relay::{LlmError, LlmProvider, ModelName};
use serde::{Deserialize, Serialize};

use crate::http::send_json;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AnswerMessage,
}

#[derive(Deserialize)]
struct AnswerMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `POST {base}/v1/chat/completions` with a single user message.
#[derive(Clone)]
pub struct OpenAiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: ModelName,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: ModelName,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model,
            timeout,
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model(&self) -> &ModelName {
        &self.model
    }

    async fn complete_with_model(&self, model: &ModelName, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let request = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: model.as_str(),
                messages: [ChatMessage {
                    role: "user",
                    content: prompt,
                }],
            });

        tracing::debug!(%model, prompt_chars = prompt.len(), "Calling OpenAI");
        let answer: ChatResponse = send_json(request, self.timeout).await?;
        let content = answer
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed {
                message: "response has no choices".to_string(),
            })?
            .message
            .content
            .unwrap_or_default();
        Ok(content.trim().to_string())
    }
}
