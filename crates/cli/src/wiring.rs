//! Builds the concrete adapters from [`Config`] and hands them out as port
//! trait objects.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use processor::MetadataGenerator;
use relay::{BoardAdmin, BoardId, RecordStore};
use slack::{Slack, SlackClient};
use trello::{LabelMap, MockBoard, TrelloClient, TrelloConfig};

use crate::config::Config;

/// The board, as seen by the processor and by the maintenance commands.
pub struct Board {
    pub store: Arc<dyn RecordStore>,
    pub admin: Arc<dyn BoardAdmin>,
}

/// Connects to Trello, or to the local mock cards when `trello.mock` is set.
pub fn board(config: &Config) -> anyhow::Result<Board> {
    let trello = &config.trello;
    if trello.mock {
        tracing::warn!(
            data_dir = %trello.mock_data_dir.display(),
            "MOCK_TRELLO is enabled; no changes will reach Trello"
        );
        let mock = Arc::new(MockBoard::new(trello.mock_data_dir.clone()));
        return Ok(Board {
            store: mock.clone(),
            admin: mock,
        });
    }

    config.validate_board()?;
    let labels = LabelMap::load(&trello.label_map_path)?;
    tracing::info!(
        path = %trello.label_map_path.display(),
        labels = labels.len(),
        "Label map loaded"
    );

    let mut client_config = TrelloConfig::new(
        trello.key.clone().unwrap_or_default(),
        trello.token.clone().unwrap_or_default(),
    );
    client_config.api_base = trello.api_base.clone();
    client_config.board_id = trello.board_id.as_deref().and_then(BoardId::new);
    client_config.comment_limit = trello.comment_limit;
    client_config.request_timeout = Duration::from_secs(trello.request_timeout_secs);

    let client = Arc::new(TrelloClient::new(client_config, labels)?);
    Ok(Board {
        store: client.clone(),
        admin: client,
    })
}

/// Wraps the configured LLM provider with the project context.
pub fn generator(config: &Config) -> anyhow::Result<MetadataGenerator> {
    config.validate_llm()?;
    let provider = llm::build_provider(&config.llm.settings())?;
    let generator = MetadataGenerator::new(provider);

    match &config.project.context_file {
        Some(path) => {
            let context = std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read project context from {}", path.display())
            })?;
            tracing::info!(path = %path.display(), "Using project context file");
            Ok(generator.with_project_context(context))
        }
        None => Ok(generator),
    }
}

/// Slack reporters. A missing or unusable token leaves both channels on the
/// `tracing` fallback.
pub fn slack(config: &Config) -> Slack {
    let client = config
        .slack
        .bot_token
        .as_deref()
        .and_then(|token| match SlackClient::new(token) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(error = %err, "Slack disabled");
                None
            }
        });
    if client.is_none() {
        tracing::info!("SLACK_BOT_TOKEN not set; status lines go to the local log only");
    }
    Slack::new(
        client,
        config.slack.log_channel.clone(),
        config.slack.channel.clone(),
    )
}
