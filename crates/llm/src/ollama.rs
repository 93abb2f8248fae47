//! Local models served by Ollama.

use std::time::Duration;

use async_trait::async_trait;
use relay::{LlmError, LlmProvider, ModelName};
use serde::{Deserialize, Serialize};

use crate::http::send_json;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Non-streaming `POST {base}/api/generate`.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    http: reqwest::Client,
    base_url: String,
    model: ModelName,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: ModelName,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model,
            timeout,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn model(&self) -> &ModelName {
        &self.model
    }

    async fn complete_with_model(&self, model: &ModelName, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let request = self.http.post(url).json(&GenerateRequest {
            model: model.as_str(),
            prompt,
            stream: false,
        });

        tracing::debug!(%model, prompt_chars = prompt.len(), "Calling Ollama");
        let answer: GenerateResponse = send_json(request, self.timeout).await?;
        Ok(answer.response.trim().to_string())
    }
}
