//! `daily-summary`: one stand-up summary per in-progress card.

use anyhow::Context;
use processor::{daily_summary, find_in_progress_list, IN_PROGRESS_NAMES};
use relay::{BoardAdmin, ListId};

use crate::config::Config;
use crate::wiring;

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let board = wiring::board(config)?;
    let generator = wiring::generator(config)?;
    let slack = wiring::slack(config);

    let list = in_progress_list(config, board.admin.as_ref()).await?;
    let sent = daily_summary(board.admin.as_ref(), &list, &generator, &slack.main, &slack.log)
        .await
        .context("Daily summary failed")?;
    println!("✅ Posted {sent} card summaries");
    Ok(())
}

/// The configured list id, or the board's in-progress list found by name.
async fn in_progress_list(config: &Config, board: &dyn BoardAdmin) -> anyhow::Result<ListId> {
    if let Some(id) = config.trello.in_progress_list_id.as_deref().and_then(ListId::new) {
        return Ok(id);
    }
    if config.trello.mock {
        // The mock board serves the same cards for every list.
        return ListId::new("mock-in-progress").context("empty list id");
    }
    config.validate_board_admin()?;
    let lists = board.board_lists().await.context("Failed to list board lists")?;
    find_in_progress_list(&lists)
        .map(|list| list.id.clone())
        .with_context(|| {
            format!(
                "No in-progress list found (set IN_PROGRESS_LIST_ID or name a list one of: {})",
                IN_PROGRESS_NAMES.join(", ")
            )
        })
}
