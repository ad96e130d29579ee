//! Time-range export: query cursor → per-conversation fetch → Bulk rows.

use std::path::Path;

use tracing::{warn, Instrument};

use recfinder_client::{ClientConfig, RecordingsClient};
use recfinder_export::IncrementalExporter;
use recfinder_models::{ExportProfile, QueryInterval};

use crate::error::RunnerResult;
use crate::logging::RunLogger;

/// Outcome of a time-range export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeExportSummary {
    pub pages: u32,
    pub conversations: usize,
    /// Query results without a conversation id.
    pub skipped: usize,
    pub recordings_written: usize,
    pub export_failures: usize,
    /// Set when a page request or a write failed and pagination stopped
    /// early.
    pub aborted: Option<String>,
}

impl RangeExportSummary {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Walk every query page for `interval`, appending each conversation's
/// recordings before moving to the next one.
///
/// A failed page or a failed write ends pagination; rows already written
/// stay in the file.
pub async fn export_time_range(
    client: &RecordingsClient,
    exporter: &IncrementalExporter,
    interval: &QueryInterval,
) -> RangeExportSummary {
    let logger = RunLogger::new("range", interval.to_query_string());
    let span = logger.create_span();

    async {
        logger.log_start(&format!("writing to {}", exporter.path().display()));

        let mut summary = RangeExportSummary::default();
        let mut cursor = client.query_cursor(interval);

        'pages: loop {
            let page = match cursor.next_page(client).await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(e) => {
                    logger.log_error(&format!("page {} failed: {}", cursor.query().current_page(), e));
                    summary.aborted = Some(e.to_string());
                    break;
                }
            };
            summary.pages = cursor.pages_fetched();

            for conversation in page.conversations {
                let Some(conversation_id) = conversation.conversation_id else {
                    warn!("Query result without conversationId, skipping");
                    summary.skipped += 1;
                    continue;
                };
                summary.conversations += 1;

                let records = client.fetch_recordings(&conversation_id).await;
                match exporter.append_records(&conversation_id, &records) {
                    Ok(written) => summary.recordings_written += written,
                    Err(e) => {
                        logger.log_error(&format!(
                            "could not export conversation {}: {}",
                            conversation_id, e
                        ));
                        summary.export_failures += 1;
                        summary.aborted = Some(e.to_string());
                        break 'pages;
                    }
                }
            }

            logger.log_progress(&format!(
                "{} pages, {} conversations, {} recordings",
                summary.pages, summary.conversations, summary.recordings_written
            ));
        }

        let message = format!(
            "{} conversations, {} recordings in {} pages",
            summary.conversations, summary.recordings_written, summary.pages
        );
        if summary.is_complete() {
            logger.log_completion(&message);
        } else {
            logger.log_warning(&format!("stopped early with partial output: {}", message));
        }
        summary
    }
    .instrument(span)
    .await
}

/// Parse the dates, connect and run a Bulk-profile export into `output`.
pub async fn run(
    client_config: ClientConfig,
    start: &str,
    end: &str,
    output: &Path,
) -> RunnerResult<RangeExportSummary> {
    let interval = QueryInterval::parse(start, end)?;
    let client = RecordingsClient::connect(client_config).await?;
    let exporter = IncrementalExporter::new(output, ExportProfile::Bulk);
    Ok(export_time_range(&client, &exporter, &interval).await)
}
