//! One-off lookups for a single conversation or recording.

use serde_json::{Map, Value};

use recfinder_client::{ClientConfig, RecordingsClient};
use recfinder_models::ConversationId;

use crate::error::RunnerResult;

/// Conversation details, or `None` when the API refused or failed.
pub async fn conversation(
    client_config: ClientConfig,
    conversation_id: &str,
) -> RunnerResult<Option<Value>> {
    let client = RecordingsClient::connect(client_config).await?;
    Ok(client
        .conversation_details(&ConversationId::from(conversation_id))
        .await)
}

/// Status fields of one recording; empty when unavailable.
pub async fn recording_status(
    client_config: ClientConfig,
    conversation_id: &str,
    recording_id: &str,
) -> RunnerResult<Map<String, Value>> {
    let client = RecordingsClient::connect(client_config).await?;
    Ok(client
        .recording_status(&ConversationId::from(conversation_id), recording_id)
        .await)
}
