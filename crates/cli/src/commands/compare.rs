//! `compare-models`: one prompt, several models, one markdown report.

use anyhow::Context;
use processor::{compare_models, write_report, DEFAULT_COMPARISON_PROMPT};
use relay::ModelName;

use crate::config::Config;
use crate::wiring;

#[derive(Debug, clap::Args)]
pub struct CompareArgs {
    /// Prompt to send. Defaults to a built-in card advice prompt.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Models to compare. Defaults to `llm.compare_models`.
    #[arg(long, value_delimiter = ',')]
    pub models: Vec<String>,
}

pub async fn run(config: &Config, args: CompareArgs) -> anyhow::Result<()> {
    let generator = wiring::generator(config)?;
    let prompt = args
        .prompt
        .unwrap_or_else(|| DEFAULT_COMPARISON_PROMPT.to_string());
    let names = if args.models.is_empty() {
        config.llm.compare_models.clone()
    } else {
        args.models
    };
    let models = model_names(&names);
    anyhow::ensure!(!models.is_empty(), "No models to compare");

    let replies = compare_models(generator.provider().as_ref(), &prompt, &models).await;
    for reply in &replies {
        println!("\n🤖 {}:\n{}", reply.model, reply.text);
    }

    let dir = &config.llm.report_dir;
    let path = write_report(dir, &prompt, &replies, chrono::Local::now())
        .await
        .with_context(|| format!("Failed to write report into {}", dir.display()))?;
    println!("\n✅ Saved comparison to {}", path.display());
    Ok(())
}

fn model_names(names: &[String]) -> Vec<ModelName> {
    names
        .iter()
        .filter_map(|name| ModelName::new(name.trim()))
        .collect()
}
