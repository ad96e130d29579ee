//! Recordings REST API client.
//!
//! Covers exactly the endpoints needed to enumerate recordings:
//! - recordings query (paginated, see [`crate::pagination`])
//! - per-conversation recording list (the detail fetcher)
//! - conversation detail and single recording status lookups

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use recfinder_models::{ConversationId, QueryInterval, RecordingQuery, RecordingQueryPage, RecordingRecord};

use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::metrics::{observe, record_recordings_fetched};
use crate::normalize::recordings_from_body;
use crate::pacing::RequestPacer;
use crate::pagination::QueryCursor;
use crate::retry::with_retry_when;

/// Prefix of response bodies included in log lines.
const BODY_LOG_LIMIT: usize = 500;

/// Client for the recordings API.
pub struct RecordingsClient {
    http: Client,
    config: ClientConfig,
    auth: Arc<Authenticator>,
    pacer: Arc<RequestPacer>,
}

impl Clone for RecordingsClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            auth: Arc::clone(&self.auth),
            pacer: Arc::clone(&self.pacer),
        }
    }
}

impl RecordingsClient {
    /// Build a client without contacting the API.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("recfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Network)?;

        let auth = Arc::new(Authenticator::new(http.clone(), &config));
        let pacer = Arc::new(RequestPacer::new(config.pacing.request_interval));

        Ok(Self {
            http,
            config,
            auth,
            pacer,
        })
    }

    /// Build a client and authenticate. Authentication failure is fatal.
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let client = Self::new(config)?;
        client.auth.authenticate().await?;
        info!(
            environment = %client.config.environment,
            api = %client.config.api_base_url,
            "Connected to recordings API"
        );
        Ok(client)
    }

    /// Create from environment variables and authenticate.
    pub async fn from_env() -> ClientResult<Self> {
        Self::connect(ClientConfig::from_env()?).await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Re-run the credentials exchange.
    pub async fn authenticate(&self) -> ClientResult<()> {
        self.auth.authenticate().await
    }

    /// Cursor over the recordings query for an interval.
    pub fn query_cursor(&self, interval: &QueryInterval) -> QueryCursor {
        QueryCursor::new(interval)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    fn conversation_url(&self, conversation_id: &ConversationId) -> String {
        self.api_url(&format!(
            "/api/v2/conversations/{}",
            urlencoding::encode(conversation_id.as_str())
        ))
    }

    /// Current session headers, authenticating first if there is no session.
    async fn headers(&self) -> ClientResult<HeaderMap> {
        if self.auth.session().await.is_none() {
            self.auth.authenticate().await?;
        }
        self.auth.headers().await
    }

    // =========================================================================
    // Recordings query
    // =========================================================================

    /// Fetch one page of the recordings query.
    pub async fn query_recordings(&self, query: &RecordingQuery) -> ClientResult<RecordingQueryPage> {
        let url = self.api_url("/api/v2/recordings/query");

        observe("query_recordings", async {
            let headers = self.headers().await?;
            info!(page = query.current_page(), interval = %query.interval, "Fetching recordings query page");

            let response = self.http.post(&url).headers(headers).json(query).send().await?;
            let status = response.status();
            let body = response.text().await?;
            debug!(status = status.as_u16(), body = %truncate(&body), "Recordings query response");

            if !status.is_success() {
                return Err(ClientError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, truncate(&body)),
                ));
            }

            serde_json::from_str(&body).map_err(|e| {
                ClientError::invalid_response(format!(
                    "recordings query page: {} (body prefix: {})",
                    e,
                    truncate(&body)
                ))
            })
        })
        .await
    }

    // =========================================================================
    // Detail fetch
    // =========================================================================

    /// Single paced attempt at a conversation's recording list.
    pub async fn conversation_recordings(
        &self,
        conversation_id: &ConversationId,
    ) -> ClientResult<Vec<RecordingRecord>> {
        let url = format!("{}/recordings", self.conversation_url(conversation_id));

        observe("conversation_recordings", async {
            self.pacer.wait().await;
            let headers = self.headers().await?;

            let response = self.http.get(&url).headers(headers).send().await?;
            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                return Err(ClientError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", url, truncate(&body)),
                ));
            }

            let json: Value = serde_json::from_str(&body)?;
            Ok(recordings_from_body(conversation_id, json))
        })
        .await
    }

    /// Recording list for a conversation, degrading to an empty list.
    ///
    /// Transport failures and non-2xx statuses are retried; before each
    /// retry the session is renewed (token expiry is the usual cause) and
    /// the backoff delay is applied. Exhausted retries, a failed re-authentication or a
    /// malformed body are logged and yield no records.
    pub async fn fetch_recordings(&self, conversation_id: &ConversationId) -> Vec<RecordingRecord> {
        let result = with_retry_when(
            &self.config.retry,
            "fetch_recordings",
            ClientError::is_failed_exchange,
            || self.conversation_recordings(conversation_id),
            |attempt| async move {
                debug!(
                    conversation_id = %conversation_id,
                    attempt = attempt + 1,
                    "Re-authenticating before retry"
                );
                self.auth.authenticate().await
            },
        )
        .await;

        match result {
            Ok(records) => {
                debug!(
                    conversation_id = %conversation_id,
                    count = records.len(),
                    "Retrieved recordings"
                );
                record_recordings_fetched(records.len());
                records
            }
            Err(e) => {
                error!(
                    conversation_id = %conversation_id,
                    "Failed to retrieve recordings after {} attempts: {}",
                    self.config.retry.max_attempts,
                    e
                );
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Best-effort lookups
    // =========================================================================

    /// Conversation detail. `None` when not visible or on any failure.
    pub async fn conversation_details(&self, conversation_id: &ConversationId) -> Option<Value> {
        let url = self.conversation_url(conversation_id);

        let result = observe("conversation_details", async {
            let headers = self.headers().await?;
            let response = self.http.get(&url).headers(headers).send().await?;
            let status = response.status();

            match status {
                StatusCode::OK => Ok(response.json::<Value>().await?),
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    Err(ClientError::from_http_status(status.as_u16(), truncate(&body)))
                }
            }
        })
        .await;

        match result {
            Ok(details) => Some(details),
            Err(ClientError::PermissionDenied(body)) => {
                warn!(
                    conversation_id = %conversation_id,
                    status = 403,
                    body = %body,
                    "Not authorized to access conversation details"
                );
                None
            }
            Err(e) => {
                warn!(
                    conversation_id = %conversation_id,
                    status = ?e.http_status(),
                    "Failed to retrieve conversation details: {}",
                    e
                );
                None
            }
        }
    }

    /// Status of a single recording. Empty map when the body is empty,
    /// malformed or not an object, or the request fails.
    pub async fn recording_status(
        &self,
        conversation_id: &ConversationId,
        recording_id: &str,
    ) -> Map<String, Value> {
        let url = format!(
            "{}/recordings/{}",
            self.conversation_url(conversation_id),
            urlencoding::encode(recording_id)
        );

        let result = observe("recording_status", async {
            let headers = self.headers().await?;
            let response = self.http.get(&url).headers(headers).send().await?;
            let status = response.status();
            let body = response.text().await?;
            info!(url = %url, status = status.as_u16(), "Recording status response");
            debug!(body = %truncate(&body), "Recording status body");
            Ok(body)
        })
        .await;

        match result {
            Ok(body) => parse_status_body(&body),
            Err(e) => {
                warn!(url = %url, "Error checking recording status: {}", e);
                Map::new()
            }
        }
    }
}

fn parse_status_body(body: &str) -> Map<String, Value> {
    if body.trim().is_empty() {
        warn!("Empty recording status body");
        return Map::new();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(kind = json_kind(&other), "Recording status body is not an object");
            Map::new()
        }
        Err(e) => {
            warn!(body = %truncate(body), "Recording status body is not valid JSON: {}", e);
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(BODY_LOG_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_status_body_tolerates_bad_input() {
        assert!(parse_status_body("").is_empty());
        assert!(parse_status_body("   ").is_empty());
        assert!(parse_status_body("{not json").is_empty());
        assert!(parse_status_body("[1, 2]").is_empty());
    }

    #[test]
    fn test_parse_status_body_object() {
        let map = parse_status_body(r#"{"id": "r1", "fileState": "AVAILABLE"}"#);
        assert_eq!(map.get("fileState"), Some(&json!("AVAILABLE")));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(BODY_LOG_LIMIT + 10);
        assert_eq!(truncate(&long).chars().count(), BODY_LOG_LIMIT);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_new_validates_config() {
        let config = ClientConfig::new("", "secret", "mypurecloud.com");
        assert!(matches!(RecordingsClient::new(config), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_conversation_url_encodes_id() {
        let client = RecordingsClient::new(
            ClientConfig::new("id", "secret", "mypurecloud.com"),
        )
        .unwrap();
        assert_eq!(
            client.conversation_url(&ConversationId::from("a b/c")),
            "https://api.mypurecloud.com/api/v2/conversations/a%20b%2Fc"
        );
    }
}
