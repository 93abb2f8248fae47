//! `sync-labels`: refreshes the label name to id cache from the board.

use std::path::{Path, PathBuf};

use anyhow::Context;
use relay::BoardAdmin;
use trello::LabelMap;

use crate::config::Config;
use crate::wiring;

#[derive(Debug, clap::Args)]
pub struct LabelArgs {
    /// Where to write the map. Defaults to `trello.label_map_path`.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn run(config: &Config, args: LabelArgs) -> anyhow::Result<()> {
    config.validate_board_admin()?;
    let output = args
        .output
        .unwrap_or_else(|| config.trello.label_map_path.clone());
    let board = wiring::board(config)?;

    let count = sync_labels(board.admin.as_ref(), &output).await?;
    println!("✅ Synced {count} labels to {}", output.display());
    Ok(())
}

/// Writes the board's named labels to `output`. Returns how many were kept.
pub async fn sync_labels(board: &dyn BoardAdmin, output: &Path) -> anyhow::Result<usize> {
    let labels = board
        .board_labels()
        .await
        .context("Failed to fetch board labels")?;
    let total = labels.len();
    let map = LabelMap::from_labels(labels);
    map.save(output)?;
    tracing::info!(
        path = %output.display(),
        named = map.len(),
        skipped = total - map.len(),
        "Label map written"
    );
    Ok(map.len())
}
