//! Recording response normalization.
//!
//! The recordings endpoint has been observed to answer with an
//! `{"entities": [...]}` envelope, a bare array, or a single recording
//! object. All three become a flat list of items.

use serde_json::Value;

use recfinder_models::{ConversationId, RecordingRecord};

/// Flatten a recordings response body into its items.
///
/// - object with an `entities` array: the array
/// - array: the array
/// - any other object: a single-element list
/// - anything else: empty
pub fn normalize_envelope(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("entities") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("entities".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    }
}

/// Normalize a response body into recording records for a conversation.
pub fn recordings_from_body(conversation_id: &ConversationId, body: Value) -> Vec<RecordingRecord> {
    normalize_envelope(body)
        .iter()
        .map(|item| RecordingRecord::from_payload(conversation_id.clone(), item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn r1() -> Value {
        json!({"id": "r1", "fileState": "AVAILABLE"})
    }

    fn r2() -> Value {
        json!({"id": "r2", "fileState": "ARCHIVED"})
    }

    #[test]
    fn test_entities_envelope() {
        assert_eq!(
            normalize_envelope(json!({"entities": [r1(), r2()], "pageSize": 25})),
            vec![r1(), r2()]
        );
    }

    #[test]
    fn test_bare_array() {
        assert_eq!(normalize_envelope(json!([r1(), r2()])), vec![r1(), r2()]);
    }

    #[test]
    fn test_bare_object() {
        assert_eq!(normalize_envelope(r1()), vec![r1()]);
    }

    #[test]
    fn test_non_array_entities_is_treated_as_single_object() {
        let body = json!({"id": "r1", "entities": "n/a"});
        assert_eq!(normalize_envelope(body.clone()), vec![body]);
    }

    #[test]
    fn test_scalars_yield_nothing() {
        assert!(normalize_envelope(Value::Null).is_empty());
        assert!(normalize_envelope(json!("text")).is_empty());
        assert!(normalize_envelope(json!({"entities": []})).is_empty());
    }

    #[test]
    fn test_records_keep_order_and_conversation() {
        let id = ConversationId::from("conv-9");
        let records = recordings_from_body(&id, json!({"entities": [r1(), r2()]}));
        let ids: Vec<_> = records.iter().map(|r| r.recording_id.as_deref()).collect();
        assert_eq!(ids, vec![Some("r1"), Some("r2")]);
        assert!(records.iter().all(|r| r.conversation_id == id));
    }
}
