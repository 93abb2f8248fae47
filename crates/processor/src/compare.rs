//! Side-by-side comparison of several models on one prompt.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use relay::{LlmProvider, ModelName};

/// Models compared when none are configured.
pub const DEFAULT_COMPARISON_MODELS: &[&str] = &["llama3", "mistral", "codellama", "phi3"];

/// Directory comparison reports are written to by default.
pub const DEFAULT_REPORT_DIR: &str = "model_logs";

const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// One model's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub model: ModelName,
    /// The trimmed answer, or `[ERROR: ...]` when the call failed.
    pub text: String,
    pub failed: bool,
}

/// Runs `prompt` against each model in turn.
///
/// A failing model is recorded in its reply and does not stop the others.
pub async fn compare_models(
    provider: &dyn LlmProvider,
    prompt: &str,
    models: &[ModelName],
) -> Vec<ModelReply> {
    let mut replies = Vec::with_capacity(models.len());
    for model in models {
        let reply = match provider.complete_with_model(model, prompt).await {
            Ok(text) => ModelReply {
                model: model.clone(),
                text: text.trim().to_string(),
                failed: false,
            },
            Err(err) => {
                tracing::warn!(%model, error = %err, "Model comparison call failed");
                ModelReply {
                    model: model.clone(),
                    text: format!("[ERROR: {err}]"),
                    failed: true,
                }
            }
        };
        replies.push(reply);
    }
    replies
}

/// Renders the comparison as a markdown document.
pub fn render_report(prompt: &str, replies: &[ModelReply], at: DateTime<Local>) -> String {
    let stamp = at.format(STAMP_FORMAT);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# 🤖 Model Comparison – {stamp}\n");
    let _ = writeln!(out, "### 📥 Prompt");
    let _ = writeln!(out, "```\n{}\n```\n", prompt.trim());
    for reply in replies {
        let _ = writeln!(out, "---\n### 🤖 Model: `{}`", reply.model);
        let _ = writeln!(out, "```\n{}\n```\n", reply.text);
    }
    out
}

/// File name of the report generated at `at`.
pub fn report_file_name(at: DateTime<Local>) -> String {
    format!("model_comparison_{}.md", at.format(STAMP_FORMAT))
}

/// Writes the rendered report into `dir`, creating it if needed.
pub async fn write_report(
    dir: &Path,
    prompt: &str,
    replies: &[ModelReply],
    at: DateTime<Local>,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(at));
    tokio::fs::write(&path, render_report(prompt, replies, at)).await?;
    tracing::info!(path = %path.display(), models = replies.len(), "Model comparison saved");
    Ok(path)
}
