//! Identifier-list export: resolve IDs → fetch each → Detail rows.

use std::path::Path;

use tracing::Instrument;

use recfinder_client::{BatchCooldown, ClientConfig, RecordingsClient};
use recfinder_export::{resolve_identifiers, IncrementalExporter};
use recfinder_models::{ConversationId, ExportProfile};

use crate::error::RunnerResult;
use crate::logging::RunLogger;

/// Outcome of an identifier-list export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdExportSummary {
    /// Identifiers available before truncation.
    pub requested: usize,
    pub processed: usize,
    /// Conversations that produced no recordings.
    pub empty: usize,
    pub recordings_written: usize,
    pub export_failures: usize,
    pub cooldowns: usize,
}

/// Process up to `max_identifiers` conversations in input order.
///
/// A failure for one identifier is logged and the batch continues.
pub async fn export_identifiers(
    client: &RecordingsClient,
    exporter: &IncrementalExporter,
    identifiers: &[String],
    max_identifiers: usize,
    mut cooldown: BatchCooldown,
) -> IdExportSummary {
    let logger = RunLogger::new("ids", exporter.path().display().to_string());
    let span = logger.create_span();

    async {
        let batch = &identifiers[..identifiers.len().min(max_identifiers)];
        let mut summary = IdExportSummary {
            requested: identifiers.len(),
            ..Default::default()
        };

        if batch.len() < identifiers.len() {
            logger.log_warning(&format!(
                "limiting run to the first {} of {} identifiers",
                batch.len(),
                identifiers.len()
            ));
        }
        logger.log_start(&format!("{} conversations", batch.len()));

        for (i, raw_id) in batch.iter().enumerate() {
            let position = i + 1;
            let conversation_id = ConversationId::from(raw_id.as_str());
            logger.log_progress(&format!(
                "processing conversation {}/{}: {}",
                position,
                batch.len(),
                conversation_id
            ));

            let records = client.fetch_recordings(&conversation_id).await;
            if records.is_empty() {
                summary.empty += 1;
            }

            match exporter.append_records(&conversation_id, &records) {
                Ok(written) => summary.recordings_written += written,
                Err(e) => {
                    logger.log_error(&format!(
                        "error processing conversation {}: {}",
                        conversation_id, e
                    ));
                    summary.export_failures += 1;
                }
            }
            summary.processed = position;

            cooldown.after_item(position).await;
        }

        summary.cooldowns = cooldown.applied();
        logger.log_completion(&format!(
            "processed {} recordings in total from {} conversations",
            summary.recordings_written, summary.processed
        ));
        summary
    }
    .instrument(span)
    .await
}

/// Resolve the input file, connect and run a Detail-profile export.
///
/// Input resolution happens before any network activity.
pub async fn run(
    client_config: ClientConfig,
    input: &Path,
    output: &Path,
    max_identifiers: usize,
) -> RunnerResult<IdExportSummary> {
    let identifiers = resolve_identifiers(input)?;
    let cooldown = client_config.pacing.batch_cooldown();
    let client = RecordingsClient::connect(client_config).await?;
    let exporter = IncrementalExporter::new(output, ExportProfile::Detail);
    Ok(export_identifiers(&client, &exporter, &identifiers, max_identifiers, cooldown).await)
}
