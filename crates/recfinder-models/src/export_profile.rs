//! Export profiles.
//!
//! The two retrieval modes write different CSV shapes. Each shape is a named
//! profile so a caller picks one explicitly per output path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recording::RecordingRecord;

const BULK_HEADER: [&str; 5] = [
    "Conversation ID",
    "Recording ID",
    "Start Time",
    "Duration (seconds)",
    "Agent Name",
];

const DETAIL_HEADER: [&str; 7] = [
    "Conversation ID",
    "Recording ID",
    "Start Time",
    "End Time",
    "Media Type",
    "File State",
    "Download URL",
];

/// CSV schema used by an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportProfile {
    /// Time-range mode: one row per recording found by the query endpoint.
    Bulk,
    /// Identifier-list mode: recording lifecycle and download details.
    #[default]
    Detail,
}

impl ExportProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportProfile::Bulk => "bulk",
            ExportProfile::Detail => "detail",
        }
    }

    /// Header row for this profile.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ExportProfile::Bulk => &BULK_HEADER,
            ExportProfile::Detail => &DETAIL_HEADER,
        }
    }

    /// Map a record onto this profile's columns, substituting the sentinel
    /// for absent fields.
    pub fn row(&self, record: &RecordingRecord) -> Vec<String> {
        match self {
            ExportProfile::Bulk => vec![
                record.conversation_id.to_string(),
                RecordingRecord::or_sentinel(record.recording_id.as_deref()),
                RecordingRecord::or_sentinel(record.start_time.as_deref()),
                RecordingRecord::or_sentinel(record.duration_seconds.as_deref()),
                RecordingRecord::or_sentinel(record.agent_name.as_deref()),
            ],
            ExportProfile::Detail => vec![
                record.conversation_id.to_string(),
                RecordingRecord::or_sentinel(record.recording_id.as_deref()),
                RecordingRecord::or_sentinel(record.start_time.as_deref()),
                RecordingRecord::or_sentinel(record.end_time.as_deref()),
                RecordingRecord::or_sentinel(record.media_type.as_deref()),
                RecordingRecord::or_sentinel(record.file_state.as_deref()),
                RecordingRecord::or_sentinel(record.download_uri.as_deref()),
            ],
        }
    }
}

impl fmt::Display for ExportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::NOT_AVAILABLE;
    use serde_json::json;

    #[test]
    fn test_row_width_matches_header() {
        let record = RecordingRecord::from_payload("c1".into(), &json!({}));
        for profile in [ExportProfile::Bulk, ExportProfile::Detail] {
            assert_eq!(profile.row(&record).len(), profile.header().len());
        }
    }

    #[test]
    fn test_detail_row_maps_fields_positionally() {
        let record = RecordingRecord::from_payload(
            "c1".into(),
            &json!({
                "id": "r1",
                "startTime": "2024-01-01T10:00:00Z",
                "endTime": "2024-01-01T10:05:00Z",
                "media": "audio",
                "fileState": "AVAILABLE",
                "mediaUris": {"0": {"mediaUri": "https://media/r1"}}
            }),
        );
        assert_eq!(
            ExportProfile::Detail.row(&record),
            vec![
                "c1",
                "r1",
                "2024-01-01T10:00:00Z",
                "2024-01-01T10:05:00Z",
                "audio",
                "AVAILABLE",
                "https://media/r1"
            ]
        );
    }

    #[test]
    fn test_bulk_row_uses_sentinel_for_missing_agent() {
        let record = RecordingRecord::from_payload(
            "c1".into(),
            &json!({"id": "r1", "startTime": "t0", "durationMilliseconds": 1500}),
        );
        assert_eq!(
            ExportProfile::Bulk.row(&record),
            vec!["c1", "r1", "t0", "1.5", NOT_AVAILABLE]
        );
    }
}
