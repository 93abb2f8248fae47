//! Morning summary of the cards currently in progress.

use relay::{BoardAdmin, BoardList, ListId, RelayError, StatusReporter};

use crate::generator::MetadataGenerator;

/// List names recognised as the "in progress" column, in match order.
pub const IN_PROGRESS_NAMES: &[&str] = &["In Progress", "In-Progress", "InProgress", "Doing", "Active"];

/// Posted to the main channel when the in-progress list is empty.
pub const NOTHING_IN_PROGRESS: &str = "✅ No active cards in progress this morning.";

/// Finds the board's in-progress list by name.
///
/// Names are compared exactly, in the order of [`IN_PROGRESS_NAMES`].
pub fn find_in_progress_list(lists: &[BoardList]) -> Option<&BoardList> {
    IN_PROGRESS_NAMES
        .iter()
        .find_map(|wanted| lists.iter().find(|list| list.name == *wanted))
}

/// Posts one summary per card in `list` to `main`.
///
/// Progress goes to `log`; any failure is reported there as well before
/// being returned. Returns the number of summaries posted.
pub async fn daily_summary(
    board: &dyn BoardAdmin,
    list: &ListId,
    generator: &MetadataGenerator,
    main: &dyn StatusReporter,
    log: &dyn StatusReporter,
) -> Result<usize, RelayError> {
    log.log("🌅 Starting daily summary script").await;

    match summarize_list(board, list, generator, main).await {
        Ok(0) => {
            log.log("📭 No cards to summarize.").await;
            Ok(0)
        }
        Ok(sent) => {
            tracing::info!(%list, sent, "Daily summary posted");
            log.log(&format!("✅ Sent {sent} card summaries to Slack")).await;
            Ok(sent)
        }
        Err(err) => {
            tracing::error!(%list, error = %err, "Daily summary failed");
            log.log(&format!("❌ Error in daily summary: {err}")).await;
            Err(err)
        }
    }
}

async fn summarize_list(
    board: &dyn BoardAdmin,
    list: &ListId,
    generator: &MetadataGenerator,
    main: &dyn StatusReporter,
) -> Result<usize, RelayError> {
    let records = board.list_records(list).await?;
    if records.is_empty() {
        main.log(NOTHING_IN_PROGRESS).await;
        return Ok(0);
    }

    for record in &records {
        let summary = generator.summarize_for_morning(record).await?;
        main.log(&format!("📌 *{}*\n{summary}\n{}", record.name, record.url))
            .await;
    }
    Ok(records.len())
}
