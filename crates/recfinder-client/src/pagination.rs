//! Cursor over the paginated recordings query.

use tracing::{debug, info};

use recfinder_models::{QueryInterval, RecordingQuery, RecordingQueryPage};

use crate::client::RecordingsClient;
use crate::error::ClientResult;

/// Query cursor state: the request body (interval, order, page size, page
/// number) plus whether the server has reported the last page.
///
/// A failed page request makes the cursor terminal; pages are not retried.
#[derive(Debug, Clone)]
pub struct QueryCursor {
    query: RecordingQuery,
    pages_fetched: u32,
    exhausted: bool,
}

impl QueryCursor {
    pub fn new(interval: &QueryInterval) -> Self {
        Self {
            query: RecordingQuery::new(interval),
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// Body the next request will send.
    pub fn query(&self) -> &RecordingQuery {
        &self.query
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next page, or `None` once the server reported no
    /// continuation.
    pub async fn next_page(
        &mut self,
        client: &RecordingsClient,
    ) -> ClientResult<Option<RecordingQueryPage>> {
        if self.exhausted {
            return Ok(None);
        }

        let page = match client.query_recordings(&self.query).await {
            Ok(page) => page,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };
        self.pages_fetched += 1;

        debug!(
            page = self.query.current_page(),
            conversations = page.conversations.len(),
            has_more = page.has_more(),
            "Received recordings query page"
        );

        if page.has_more() {
            self.query.advance();
        } else {
            self.exhausted = true;
            info!(pages = self.pages_fetched, "Recordings query exhausted");
        }

        Ok(Some(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor_starts_at_first_page() {
        let interval = QueryInterval::parse("2024-01-01", "2024-01-07").unwrap();
        let cursor = QueryCursor::new(&interval);
        assert_eq!(cursor.query().page_number, None);
        assert_eq!(cursor.query().current_page(), 1);
        assert_eq!(cursor.pages_fetched(), 0);
        assert!(!cursor.is_exhausted());
    }
}
