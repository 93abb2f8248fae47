//! The per-event card pipeline run by the queue worker.

use std::sync::Arc;

use async_trait::async_trait;
use relay::{
    labels_from_context, sign_reply, split_context, with_context, EventProcessor, LabelName,
    QueuedEvent, RecordStore, RelayError, StatusReporter,
};

use crate::generator::MetadataGenerator;

/// Processes one board event end to end.
///
/// Steps, each aborting the rest on failure:
///
/// 1. fetch the card
/// 2. if its description has no `[Context]` block, infer one, write it back,
///    and apply the labels it names
/// 3. generate advice, sign it, and post it as a comment
pub struct CardProcessor {
    store: Arc<dyn RecordStore>,
    generator: MetadataGenerator,
    reporter: Arc<dyn StatusReporter>,
}

impl CardProcessor {
    pub fn new(
        store: Arc<dyn RecordStore>,
        generator: MetadataGenerator,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            store,
            generator,
            reporter,
        }
    }
}

#[async_trait]
impl EventProcessor for CardProcessor {
    async fn process(&self, event: &QueuedEvent) -> Result<(), RelayError> {
        let record_id = &event.record_id;
        let comment = event.comment_text.as_deref();

        self.reporter
            .log(&format!("✅ Fetch Card Data: {record_id}"))
            .await;
        let record = self.store.fetch_record(record_id).await?;
        let name = record.name.as_str();

        let split = split_context(&record.description);
        let metadata = match split.context {
            Some(existing) => existing,
            None => {
                let inferred = self
                    .generator
                    .infer_metadata(name, &split.cleaned, comment)
                    .await?;
                self.store
                    .update_description(record_id, &with_context(&inferred, &split.cleaned))
                    .await?;
                tracing::info!(%record_id, "Metadata block added to card description");
                self.reporter
                    .log(&format!("🧠 Added metadata to '{name}'"))
                    .await;

                let labels = labels_from_context(&inferred);
                self.store.set_labels(record_id, &labels).await?;
                self.reporter
                    .log(&format!(
                        "🏷️ Labels added to '{name}': [{}]",
                        join_labels(&labels)
                    ))
                    .await;
                inferred
            }
        };

        self.reporter
            .log(&format!("✅ Processing Trello card: {name} - {}", split.cleaned))
            .await;
        let advice = self
            .generator
            .compose_advice(&metadata, name, &split.cleaned, comment)
            .await?;
        self.reporter.log(&format!("🤖 AI Reply: {advice}")).await;
        self.store
            .add_comment(record_id, &sign_reply(&advice))
            .await?;

        tracing::info!(%record_id, event_type = %event.event_type, "Reply posted");
        self.reporter
            .log(&format!(
                "✅ Processed Trello action: {} for card '{name}'",
                event.event_type
            ))
            .await;
        Ok(())
    }
}

fn join_labels(labels: &[LabelName]) -> String {
    labels
        .iter()
        .map(LabelName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
