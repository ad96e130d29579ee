//! Client-credentials authentication.
//!
//! The [`Authenticator`] owns the current [`Session`]. Re-authentication
//! replaces the session wholesale under a write lock, so concurrent
//! attempts are serialized and readers never observe a half-built set of
//! headers.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::config::{ClientConfig, Credentials};
use crate::error::{ClientError, ClientResult};
use crate::metrics::observe;
use crate::retry::{with_backoff_when, RetryConfig};

/// Characters of the token shown in diagnostics.
const TOKEN_PREVIEW_CHARS: usize = 10;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Bearer token plus the request headers derived from it.
#[derive(Clone)]
pub struct Session {
    access_token: String,
    headers: HeaderMap,
    issued_at: DateTime<Utc>,
    expires_in: Option<u64>,
}

impl Session {
    fn new(access_token: String, expires_in: Option<u64>) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|_| ClientError::invalid_response("access token is not a valid header value"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            access_token,
            headers,
            issued_at: Utc::now(),
            expires_in,
        })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Token lifetime in seconds as reported by the login service.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    /// Leading characters of the token, safe to log.
    pub fn token_preview(&self) -> String {
        let prefix: String = self.access_token.chars().take(TOKEN_PREVIEW_CHARS).collect();
        format!("{}...", prefix)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token_preview())
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Exchanges client credentials for bearer tokens.
pub struct Authenticator {
    http: Client,
    token_url: String,
    credentials: Credentials,
    retry: RetryConfig,
    session: RwLock<Option<Session>>,
}

impl Authenticator {
    pub fn new(http: Client, config: &ClientConfig) -> Self {
        Self {
            http,
            token_url: format!("{}/oauth/token", config.login_base_url),
            credentials: config.credentials.clone(),
            retry: config.retry.clone(),
            session: RwLock::new(None),
        }
    }

    /// Obtain a fresh token and replace the session.
    ///
    /// Retries transport failures and any non-2xx status with exponential
    /// backoff. A 2xx body that is not a token is not retried. On final
    /// failure the previous session (if any) is left untouched and an
    /// [`ClientError::AuthError`] is returned.
    pub async fn authenticate(&self) -> ClientResult<()> {
        let mut session = self.session.write().await;

        let fresh = with_backoff_when(
            &self.retry,
            "authenticate",
            ClientError::is_failed_exchange,
            || self.request_token(),
        )
        .await
        .map_err(|e| {
            error!("Authentication failed: {}", e);
            match e {
                ClientError::AuthError(_) => e,
                other => ClientError::auth_error(other.to_string()),
            }
        })?;

        debug!(token = %fresh.token_preview(), expires_in = ?fresh.expires_in, "Issued new session");
        *session = Some(fresh);
        info!("Successfully authenticated");
        Ok(())
    }

    async fn request_token(&self) -> ClientResult<Session> {
        observe("authenticate", async {
            let form = [
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ];

            let response = self.http.post(&self.token_url).form(&form).send().await?;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if !status.is_success() {
                return Err(ClientError::from_http_status(
                    status.as_u16(),
                    format!("{} failed: {}", self.token_url, body),
                ));
            }

            let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
                ClientError::invalid_response(format!("token response: {}", e))
            })?;
            if token.access_token.is_empty() {
                return Err(ClientError::invalid_response("token response has an empty access_token"));
            }

            Session::new(token.access_token, token.expires_in)
        })
        .await
    }

    /// Headers of the current session.
    pub async fn headers(&self) -> ClientResult<HeaderMap> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.headers().clone())
            .ok_or_else(|| ClientError::auth_error("not authenticated"))
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }
}
