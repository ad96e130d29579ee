//! Recordings query types.
//!
//! The query endpoint takes an ISO-8601 interval with an exclusive upper
//! bound, a sort order and a page size, and answers with a page of
//! conversations plus an optional continuation reference.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::ConversationId;

/// Page size requested from the query endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Newest conversations first.
pub const DEFAULT_SORT_ORDER: &str = "desc";

const DATE_FORMAT: &str = "%Y-%m-%d";
const BOUNDARY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Errors building a query interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Date {0} is out of range")]
    OutOfRange(NaiveDate),
}

/// Half-open UTC interval covering whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryInterval {
    start: NaiveDate,
    /// Exclusive: the day after the requested end date.
    end_exclusive: NaiveDate,
}

impl QueryInterval {
    /// Interval from the start of `start` to the end of `end` (inclusive).
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::EndBeforeStart { start, end });
        }
        let end_exclusive = end.succ_opt().ok_or(IntervalError::OutOfRange(end))?;
        Ok(Self {
            start,
            end_exclusive,
        })
    }

    /// Parse two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> Result<Self, IntervalError> {
        Self::from_dates(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end_exclusive(&self) -> NaiveDate {
        self.end_exclusive
    }

    /// Wire form, e.g. `2024-01-01T00:00:00Z/2024-01-02T00:00:00Z`.
    pub fn to_query_string(&self) -> String {
        format!(
            "{}Z/{}Z",
            self.start.and_time(NaiveTime::MIN).format(BOUNDARY_FORMAT),
            self.end_exclusive.and_time(NaiveTime::MIN).format(BOUNDARY_FORMAT)
        )
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, IntervalError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| IntervalError::InvalidDate(s.to_string()))
}

/// Body of `POST /api/v2/recordings/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingQuery {
    pub interval: String,
    pub order: String,
    pub page_size: u32,
    /// Omitted on the first request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl RecordingQuery {
    pub fn new(interval: &QueryInterval) -> Self {
        Self {
            interval: interval.to_query_string(),
            order: DEFAULT_SORT_ORDER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_number: None,
        }
    }

    /// 1-based page this body will request.
    pub fn current_page(&self) -> u32 {
        self.page_number.unwrap_or(1)
    }

    /// Move the body to the following page.
    pub fn advance(&mut self) {
        self.page_number = Some(self.current_page() + 1);
    }
}

/// Conversation entry in a query page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRef {
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordingQueryPage {
    pub conversations: Vec<ConversationRef>,
    pub next_uri: Option<String>,
}

impl RecordingQueryPage {
    /// True when the server reported a continuation reference.
    pub fn has_more(&self) -> bool {
        self.next_uri.as_deref().is_some_and(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_day_interval() {
        let interval = QueryInterval::parse("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(
            interval.to_query_string(),
            "2024-01-01T00:00:00Z/2024-01-02T00:00:00Z"
        );
    }

    #[test]
    fn test_upper_bound_is_end_plus_one_day() {
        let cases = [
            ("2024-01-01", "2024-01-31", "2024-02-01"),
            ("2024-02-01", "2024-02-28", "2024-02-29"),
            ("2023-02-01", "2023-02-28", "2023-03-01"),
            ("2024-12-01", "2024-12-31", "2025-01-01"),
        ];
        for (start, end, expected) in cases {
            let interval = QueryInterval::parse(start, end).unwrap();
            assert_eq!(interval.end_exclusive().to_string(), expected);
            assert!(interval
                .to_query_string()
                .ends_with(&format!("/{}T00:00:00Z", expected)));
        }
    }

    #[test]
    fn test_rejects_reversed_range() {
        let err = QueryInterval::parse("2024-01-02", "2024-01-01").unwrap_err();
        assert!(matches!(err, IntervalError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_rejects_malformed_date() {
        assert_eq!(
            QueryInterval::parse("01/02/2024", "2024-01-03").unwrap_err(),
            IntervalError::InvalidDate("01/02/2024".to_string())
        );
    }

    #[test]
    fn test_query_body_shape() {
        let interval = QueryInterval::parse("2024-01-01", "2024-01-01").unwrap();
        let mut query = RecordingQuery::new(&interval);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "interval": "2024-01-01T00:00:00Z/2024-01-02T00:00:00Z",
                "order": "desc",
                "pageSize": 100
            })
        );

        query.advance();
        assert_eq!(serde_json::to_value(&query).unwrap()["pageNumber"], 2);
        query.advance();
        assert_eq!(query.current_page(), 3);
    }

    #[test]
    fn test_page_continuation() {
        let page: RecordingQueryPage = serde_json::from_value(json!({
            "conversations": [{"conversationId": "a"}, {"other": 1}],
            "nextUri": "/api/v2/recordings/query?pageNumber=2"
        }))
        .unwrap();
        assert!(page.has_more());
        assert_eq!(page.conversations.len(), 2);
        assert_eq!(page.conversations[1].conversation_id, None);

        let last: RecordingQueryPage =
            serde_json::from_value(json!({"conversations": [], "nextUri": ""})).unwrap();
        assert!(!last.has_more());

        let bare: RecordingQueryPage = serde_json::from_value(json!({})).unwrap();
        assert!(!bare.has_more());
        assert!(bare.conversations.is_empty());
    }
}
