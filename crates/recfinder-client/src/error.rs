//! Client error types.

use thiserror::Error;

/// Result type for API client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the platform API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed ({0}): {1}")]
    RequestFailed(u16, String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Classify a non-success HTTP status.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            401 => Self::Unauthorized(msg),
            403 => Self::PermissionDenied(msg),
            429 => Self::RateLimited(msg),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(status, msg),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::PermissionDenied(_) => Some(403),
            ClientError::RateLimited(_) => Some(429),
            ClientError::ServerError(status, _) | ClientError::RequestFailed(status, _) => {
                Some(*status)
            }
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if error is a transport-level failure worth retrying.
    ///
    /// An expired token surfaces as 401, which a retry after
    /// re-authentication can recover from.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_)
            | ClientError::Unauthorized(_)
            | ClientError::RateLimited(_)
            | ClientError::ServerError(_, _) => true,
            ClientError::RequestFailed(status, _) => *status == 408,
            _ => false,
        }
    }

    /// Check if the request never produced a usable 2xx response: a
    /// transport failure or any non-success status.
    ///
    /// Decoding failures of a 2xx body are excluded; repeating the request
    /// would return the same body.
    pub fn is_failed_exchange(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            other => other.http_status().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_classification() {
        assert!(matches!(
            ClientError::from_http_status(401, "expired"),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_http_status(403, "denied"),
            ClientError::PermissionDenied(_)
        ));
        assert!(matches!(
            ClientError::from_http_status(429, "slow down"),
            ClientError::RateLimited(_)
        ));
        assert!(matches!(
            ClientError::from_http_status(503, "unavailable"),
            ClientError::ServerError(503, _)
        ));
        assert!(matches!(
            ClientError::from_http_status(404, "missing"),
            ClientError::RequestFailed(404, _)
        ));
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [401, 408, 429, 500, 502, 503] {
            assert!(
                ClientError::from_http_status(status, "x").is_retryable(),
                "{} should be retryable",
                status
            );
        }
        for status in [400, 403, 404, 409] {
            assert!(
                !ClientError::from_http_status(status, "x").is_retryable(),
                "{} should not be retryable",
                status
            );
        }
    }

    #[test]
    fn test_malformed_body_is_not_retryable() {
        let err = ClientError::invalid_response("missing access_token");
        assert!(!err.is_retryable());
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_http_status_getter() {
        assert_eq!(ClientError::from_http_status(502, "bad gateway").http_status(), Some(502));
        assert_eq!(ClientError::PermissionDenied("x".into()).http_status(), Some(403));
    }

    #[test]
    fn test_failed_exchange_covers_every_status() {
        for status in [400, 401, 403, 404, 408, 429, 500, 503] {
            assert!(
                ClientError::from_http_status(status, "x").is_failed_exchange(),
                "status {} should count as a failed exchange",
                status
            );
        }
        assert!(!ClientError::invalid_response("bad token body").is_failed_exchange());
        assert!(!ClientError::auth_error("no session").is_failed_exchange());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ClientError::from(json_err).is_failed_exchange());
    }
}
