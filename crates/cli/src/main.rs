//! Card relay CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: load `.env`, then `cardrelay.toml`, then apply
//!    environment overrides (see [`config`]).
//! 2. **Wire observability**: install the `tracing-subscriber` registry with a
//!    text or JSON layer and, when configured, an OpenTelemetry OTLP exporter.
//!    All `tracing` spans and structured events emitted by every crate in the
//!    workspace flow through it.
//! 3. **Construct infrastructure**: create the Trello (or mock) board, the LLM
//!    provider, and the Slack reporters, and inject them into the processor
//!    (see [`wiring`]).
//! 4. **Dispatch**:
//!    - `serve` (default): the webhook listener and queue worker.
//!    - `register-webhook`, `sync-labels`: board maintenance.
//!    - `daily-summary`, `compare-models`, `check-provider`: one-shot jobs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod telemetry;
mod wiring;

use commands::compare::CompareArgs;
use commands::labels::LabelArgs;
use commands::webhook::WebhookArgs;
use config::{Config, LogFormat};

#[derive(Parser, Debug)]
#[command(
    name = "cardrelay",
    version,
    about = "Relays Trello card activity to an LLM and posts its advice back"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "cardrelay.toml", env = "CARDRELAY_CONFIG")]
    config: PathBuf,

    /// Overrides `telemetry.log_format`.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Receive board webhooks and process them one at a time (default).
    Serve,
    /// Register (or keep) the webhook on the board's in-progress list.
    RegisterWebhook(WebhookArgs),
    /// Refresh the label name to id map from the board.
    SyncLabels(LabelArgs),
    /// Post a stand-up summary of every in-progress card to Slack.
    DailySummary,
    /// Run one prompt against several models and save a markdown report.
    CompareModels(CompareArgs),
    /// Send a greeting to the configured LLM provider.
    CheckProvider,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing `.env` is normal in deployed environments.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(format) = cli.log_format {
        config.telemetry.log_format = format;
    }

    let _telemetry = telemetry::init(&config.telemetry)?;
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }
    tracing::info!(
        config = %cli.config.display(),
        provider = %config.llm.provider,
        mock = config.trello.mock,
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run(&config).await,
        Command::RegisterWebhook(args) => commands::webhook::run(&config, args).await,
        Command::SyncLabels(args) => commands::labels::run(&config, args).await,
        Command::DailySummary => commands::summary::run(&config).await,
        Command::CompareModels(args) => commands::compare::run(&config, args).await,
        Command::CheckProvider => commands::provider::run(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["cardrelay"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("cardrelay.toml"));
    }

    #[test]
    fn compare_models_splits_the_model_list() {
        let cli = Cli::try_parse_from([
            "cardrelay",
            "compare-models",
            "--models",
            "llama3,phi3",
            "--prompt",
            "hi",
        ])
        .expect("parse");
        let Some(Command::CompareModels(args)) = cli.command else {
            panic!("expected compare-models");
        };
        assert_eq!(args.models, ["llama3", "phi3"]);
        assert_eq!(args.prompt.as_deref(), Some("hi"));
    }

    #[test]
    fn register_webhook_flags() {
        let cli = Cli::try_parse_from([
            "cardrelay",
            "--log-format",
            "json",
            "register-webhook",
            "--callback-url",
            "https://relay.example/webhook",
            "--replace",
        ])
        .expect("parse");
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        let Some(Command::RegisterWebhook(args)) = cli.command else {
            panic!("expected register-webhook");
        };
        assert!(args.replace);
        assert_eq!(args.callback_url.as_deref(), Some("https://relay.example/webhook"));
    }
}
