//! Contact-center REST API client for recording metadata.
//!
//! This crate provides:
//! - Client-credentials authentication with retry and exponential backoff
//! - Cursor pagination over the recordings query endpoint
//! - Per-conversation recording fetch with envelope normalization
//! - Request pacing and batch cooldowns
//! - Best-effort conversation detail and recording status lookups

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod pacing;
pub mod pagination;
pub mod retry;

pub use auth::{Authenticator, Session};
pub use client::RecordingsClient;
pub use config::{ClientConfig, Credentials, DEFAULT_ENVIRONMENT};
pub use error::{ClientError, ClientResult};
pub use normalize::{normalize_envelope, recordings_from_body};
pub use pacing::{BatchCooldown, PacingConfig, RequestPacer};
pub use pagination::QueryCursor;
pub use retry::RetryConfig;
