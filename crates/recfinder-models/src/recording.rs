//! Normalized recording record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::ConversationId;

/// Placeholder written for any attribute absent from the upstream payload.
pub const NOT_AVAILABLE: &str = "N/A";

/// A recording attached to a conversation, normalized from whatever shape
/// the recordings endpoint returned.
///
/// Immutable once constructed; `None` means the attribute was missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingRecord {
    pub conversation_id: ConversationId,
    pub recording_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub media_type: Option<String>,
    pub file_state: Option<String>,
    pub download_uri: Option<String>,
    /// Duration in seconds, derived from `durationMilliseconds`.
    pub duration_seconds: Option<String>,
    pub agent_name: Option<String>,
}

impl RecordingRecord {
    /// Build a record from one item of a recordings response.
    ///
    /// Every field is read defensively; a non-object payload yields a record
    /// with only the conversation id set.
    pub fn from_payload(conversation_id: ConversationId, payload: &Value) -> Self {
        let field = |name: &str| payload.get(name).and_then(text);

        Self {
            conversation_id,
            recording_id: field("id"),
            start_time: field("startTime"),
            end_time: field("endTime"),
            media_type: field("media").or_else(|| field("mediaType")),
            file_state: field("fileState"),
            download_uri: download_uri(payload),
            duration_seconds: payload
                .get("durationMilliseconds")
                .and_then(Value::as_f64)
                .map(|ms| (ms / 1000.0).to_string()),
            agent_name: payload
                .get("agent")
                .and_then(|agent| agent.get("name"))
                .and_then(text),
        }
    }

    /// Field value or the sentinel.
    pub fn or_sentinel(value: Option<&str>) -> String {
        value.unwrap_or(NOT_AVAILABLE).to_string()
    }
}

/// `mediaUris["0"].mediaUri` first, then `download.url`.
fn download_uri(payload: &Value) -> Option<String> {
    payload
        .get("mediaUris")
        .and_then(|uris| uris.get("0"))
        .and_then(|first| first.get("mediaUri"))
        .and_then(text)
        .or_else(|| {
            payload
                .get("download")
                .and_then(|download| download.get("url"))
                .and_then(text)
        })
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
