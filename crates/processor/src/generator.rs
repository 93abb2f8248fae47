//! Metadata and reply generation on top of an [`LlmProvider`].

use std::sync::Arc;

use relay::{strip_context_header, LlmError, LlmProvider, Record};

use crate::prompts::{advice_prompt, metadata_prompt, morning_summary_prompt, PROJECT_CONTEXT};

/// Turns card contents into prompts and model output into card text.
///
/// Cheap to clone; the provider is shared.
#[derive(Clone)]
pub struct MetadataGenerator {
    provider: Arc<dyn LlmProvider>,
    project_context: String,
}

impl MetadataGenerator {
    /// Creates a generator using the built-in project context.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            project_context: PROJECT_CONTEXT.to_string(),
        }
    }

    /// Replaces the project context that opens every prompt.
    pub fn with_project_context(mut self, context: impl Into<String>) -> Self {
        self.project_context = context.into();
        self
    }

    /// The project context in use.
    pub fn project_context(&self) -> &str {
        &self.project_context
    }

    /// The provider behind this generator.
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Infers `GameSystem` / `Mode` / `Subsystem` metadata for a card.
    ///
    /// Returns the block body without the `[Context]` header.
    pub async fn infer_metadata(
        &self,
        name: &str,
        description: &str,
        comment: Option<&str>,
    ) -> Result<String, LlmError> {
        let prompt = metadata_prompt(&self.project_context, name, description, comment);
        let output = self.ask(&prompt).await?;
        let body = strip_context_header(&output);
        if body.is_empty() {
            return Err(self.empty());
        }
        Ok(body.to_string())
    }

    /// Produces the next-step advice posted as a reply.
    pub async fn compose_advice(
        &self,
        metadata: &str,
        name: &str,
        description: &str,
        comment: Option<&str>,
    ) -> Result<String, LlmError> {
        let prompt = advice_prompt(&self.project_context, metadata, name, description, comment);
        self.ask(&prompt).await
    }

    /// Produces a short stand-up summary of an in-progress card.
    pub async fn summarize_for_morning(&self, record: &Record) -> Result<String, LlmError> {
        let prompt = morning_summary_prompt(&self.project_context, &record.name, &record.description);
        self.ask(&prompt).await
    }

    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let output = self.provider.complete(prompt).await?;
        let output = output.trim();
        if output.is_empty() {
            return Err(self.empty());
        }
        Ok(output.to_string())
    }

    fn empty(&self) -> LlmError {
        LlmError::EmptyResponse {
            model: self.provider.model().to_string(),
        }
    }
}

impl std::fmt::Debug for MetadataGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataGenerator")
            .field("model", self.provider.model())
            .finish_non_exhaustive()
    }
}
