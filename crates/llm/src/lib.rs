//! Card relay LLM provider adapters.
//!
//! Implements [`relay::LlmProvider`] for a local Ollama server
//! ([`OllamaProvider`]) and the OpenAI chat completions API
//! ([`OpenAiProvider`]). [`build_provider`] picks one from [`LlmSettings`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing,
//! and the per-request timeout live here. The `processor` crate sees only
//! [`relay::LlmProvider`].

mod http;
mod ollama;
mod openai;
mod provider;

pub use ollama::{OllamaProvider, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL};
pub use provider::{build_provider, LlmSettings, ProviderError, ProviderKind, DEFAULT_LLM_TIMEOUT};
