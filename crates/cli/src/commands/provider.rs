//! `check-provider`: a one-prompt smoke test of the configured LLM backend.

use anyhow::Context;
use relay::LlmProvider;

use crate::config::Config;
use crate::wiring;

pub const GREETING_PROMPT: &str =
    "Hello! Please respond with a brief greeting and confirm you're working.";

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let generator = wiring::generator(config)?;
    let provider = generator.provider();
    println!(
        "🔍 Testing {} provider with model {}...",
        config.llm.provider,
        provider.model()
    );

    let reply = greet(provider.as_ref()).await?;
    println!("✅ Provider answered:\n{reply}");
    Ok(())
}

async fn greet(provider: &dyn LlmProvider) -> anyhow::Result<String> {
    provider
        .complete(GREETING_PROMPT)
        .await
        .with_context(|| format!("Model {} did not answer", provider.model()))
}
