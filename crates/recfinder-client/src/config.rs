//! Client configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::pacing::PacingConfig;
use crate::retry::RetryConfig;

/// Public region used when no environment is configured.
pub const DEFAULT_ENVIRONMENT: &str = "mypurecloud.com";

/// OAuth client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Client-credentials pair
    pub credentials: Credentials,
    /// Region domain, e.g. `mypurecloud.com`
    pub environment: String,
    /// API base URL, `https://api.<environment>` unless overridden
    pub api_base_url: String,
    /// Login base URL, `https://login.<environment>` unless overridden
    pub login_base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Request pacing
    pub pacing: PacingConfig,
}

impl ClientConfig {
    /// Config for a region with default tuning.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        let environment = environment.into();
        Self {
            credentials: Credentials::new(client_id, client_secret),
            api_base_url: format!("https://api.{}", environment),
            login_base_url: format!("https://login.{}", environment),
            environment,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            pacing: PacingConfig::default(),
        }
    }

    /// Point the client at explicit base URLs (proxies, mock servers).
    pub fn with_base_urls(mut self, api: impl Into<String>, login: impl Into<String>) -> Self {
        self.api_base_url = trim_base(api.into());
        self.login_base_url = trim_base(login.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let client_id = non_empty_var("GENESYS_CLIENT_ID");
        let client_secret = non_empty_var("GENESYS_CLIENT_SECRET");

        let (client_id, client_secret) = match (client_id, client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(ClientError::config(
                    "Missing credentials: GENESYS_CLIENT_ID and GENESYS_CLIENT_SECRET must be set",
                ))
            }
        };

        let environment = non_empty_var("GENESYS_ENVIRONMENT")
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let mut config = Self::new(client_id, client_secret, environment);

        if let Some(api) = non_empty_var("GENESYS_API_URL") {
            config.api_base_url = trim_base(api);
        }
        if let Some(login) = non_empty_var("GENESYS_LOGIN_URL") {
            config.login_base_url = trim_base(login);
        }

        config.timeout = Duration::from_secs(
            std::env::var("RECFINDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );
        config.connect_timeout = Duration::from_secs(
            std::env::var("RECFINDER_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        );
        config.retry = RetryConfig::from_env();
        config.pacing = PacingConfig::from_env();

        config.validate()?;
        Ok(config)
    }

    /// Check the config before any network activity.
    pub fn validate(&self) -> ClientResult<()> {
        if self.credentials.client_id.trim().is_empty() {
            return Err(ClientError::config("client id cannot be empty"));
        }
        if self.credentials.client_secret.trim().is_empty() {
            return Err(ClientError::config("client secret cannot be empty"));
        }
        validate_base_url("API", &self.api_base_url)?;
        validate_base_url("login", &self.login_base_url)?;
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn validate_base_url(label: &str, raw: &str) -> ClientResult<()> {
    let url = Url::parse(raw)
        .map_err(|e| ClientError::config(format!("invalid {} URL '{}': {}", label, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::config(format!(
            "unsupported {} URL scheme '{}'",
            label, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "GENESYS_CLIENT_ID",
            "GENESYS_CLIENT_SECRET",
            "GENESYS_ENVIRONMENT",
            "GENESYS_API_URL",
            "GENESYS_LOGIN_URL",
            "RECFINDER_TIMEOUT_SECS",
            "RECFINDER_RETRY_BASE_MS",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_urls_derived_from_environment() {
        let config = ClientConfig::new("id", "secret", "mypurecloud.de");
        assert_eq!(config.api_base_url, "https://api.mypurecloud.de");
        assert_eq!(config.login_base_url, "https://login.mypurecloud.de");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("id", "super-secret", DEFAULT_ENVIRONMENT);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let config = ClientConfig::new("id", "secret", DEFAULT_ENVIRONMENT)
            .with_base_urls("http://127.0.0.1:9000/", "http://127.0.0.1:9001");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.login_base_url, "http://127.0.0.1:9001");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig::new("id", "secret", DEFAULT_ENVIRONMENT)
            .with_base_urls("not a url", "ftp://login.example.com");
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_credentials() {
        clear_env();
        std::env::set_var("GENESYS_CLIENT_ID", "id");
        assert!(matches!(ClientConfig::from_env(), Err(ClientError::Config(_))));

        std::env::set_var("GENESYS_CLIENT_SECRET", "  ");
        assert!(matches!(ClientConfig::from_env(), Err(ClientError::Config(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_environment() {
        clear_env();
        std::env::set_var("GENESYS_CLIENT_ID", "id");
        std::env::set_var("GENESYS_CLIENT_SECRET", "secret");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(config.api_base_url, "https://api.mypurecloud.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.base_delay, Duration::from_secs(1));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        std::env::set_var("GENESYS_CLIENT_ID", "id");
        std::env::set_var("GENESYS_CLIENT_SECRET", "secret");
        std::env::set_var("GENESYS_ENVIRONMENT", "usw2.pure.cloud");
        std::env::set_var("GENESYS_LOGIN_URL", "http://localhost:8080/");
        std::env::set_var("RECFINDER_TIMEOUT_SECS", "not-a-number");
        std::env::set_var("RECFINDER_RETRY_BASE_MS", "250");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, "https://api.usw2.pure.cloud");
        assert_eq!(config.login_base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.base_delay, Duration::from_millis(250));
        clear_env();
    }
}
