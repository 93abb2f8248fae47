//! Provider selection.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use relay::{LlmProvider, ModelName};
use serde::Deserialize;
use thiserror::Error;

use crate::ollama::{OllamaProvider, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::openai::{OpenAiProvider, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL};

/// Default per-request timeout. Local models on modest hardware are slow.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// Which backend answers prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        })
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown AI provider '{0}' (expected 'ollama' or 'openai')")]
    UnknownProvider(String),

    #[error("OPENAI_API_KEY must be set when AI_PROVIDER is 'openai'")]
    MissingApiKey,

    #[error("Model name must not be empty")]
    EmptyModel,

    #[error("Failed to build LLM HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Everything needed to construct a provider.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_url: String,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_api_key: None,
            request_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}

impl LlmSettings {
    /// Model used by the selected provider.
    pub fn active_model(&self) -> &str {
        match self.provider {
            ProviderKind::Ollama => &self.ollama_model,
            ProviderKind::OpenAi => &self.openai_model,
        }
    }
}

/// Builds the configured provider.
pub fn build_provider(settings: &LlmSettings) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    let http = reqwest::Client::builder()
        .build()
        .map_err(ProviderError::Client)?;
    let model = ModelName::new(settings.active_model()).ok_or(ProviderError::EmptyModel)?;

    let provider: Arc<dyn LlmProvider> = match settings.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            http,
            settings.ollama_url.clone(),
            model,
            settings.request_timeout,
        )),
        ProviderKind::OpenAi => {
            let api_key = settings
                .openai_api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or(ProviderError::MissingApiKey)?;
            Arc::new(OpenAiProvider::new(
                http,
                settings.openai_url.clone(),
                api_key,
                model,
                settings.request_timeout,
            ))
        }
    };

    tracing::info!(
        provider = %settings.provider,
        model = settings.active_model(),
        "LLM provider configured"
    );
    Ok(provider)
}
