//! Request pacing.
//!
//! Two granularities:
//! - [`RequestPacer`]: minimum spacing between dependent per-conversation
//!   requests, backed by a `governor` rate limiter with a burst of one.
//! - [`BatchCooldown`]: a longer pause after every N processed identifiers
//!   in batch runs.

use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tracing::{debug, info};

/// Direct (unkeyed) governor limiter.
pub type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Pacing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    /// Minimum spacing between dependent requests.
    pub request_interval: Duration,
    /// Cool down after this many processed identifiers (0 disables).
    pub cooldown_every: usize,
    /// Length of each cooldown.
    pub cooldown: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_millis(200),
            cooldown_every: 50,
            cooldown: Duration::from_secs(5),
        }
    }
}

impl PacingConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            request_interval: std::env::var("RECFINDER_REQUEST_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_interval),
            cooldown_every: std::env::var("RECFINDER_COOLDOWN_EVERY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cooldown_every),
            cooldown: std::env::var("RECFINDER_COOLDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cooldown),
        }
    }

    /// Cooldown schedule for a batch run.
    pub fn batch_cooldown(&self) -> BatchCooldown {
        BatchCooldown::new(self.cooldown_every, self.cooldown)
    }
}

/// Enforces a minimum interval between dependent requests.
///
/// The first request passes immediately; each later one waits until
/// `interval` has elapsed since the previous permit.
pub struct RequestPacer {
    limiter: Option<DirectRateLimiter>,
    interval: Duration,
}

impl RequestPacer {
    /// Create a pacer. A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            limiter: Quota::with_period(interval).map(RateLimiter::direct),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next request slot.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("interval", &self.interval)
            .finish()
    }
}

/// Periodic cooldown over long identifier batches.
#[derive(Debug, Clone)]
pub struct BatchCooldown {
    every: usize,
    duration: Duration,
    applied: usize,
}

impl BatchCooldown {
    pub fn new(every: usize, duration: Duration) -> Self {
        Self {
            every,
            duration,
            applied: 0,
        }
    }

    /// Whether a cooldown follows the `processed`-th item (1-based).
    pub fn is_due(&self, processed: usize) -> bool {
        self.every > 0 && processed > 0 && processed % self.every == 0
    }

    /// Sleep if a cooldown is due after `processed` items. Returns whether
    /// one was applied.
    pub async fn after_item(&mut self, processed: usize) -> bool {
        if !self.is_due(processed) {
            return false;
        }

        info!(
            processed,
            cooldown_secs = self.duration.as_secs_f64(),
            "Pausing to avoid rate limits"
        );
        tokio::time::sleep(self.duration).await;
        self.applied += 1;
        debug!(applied = self.applied, "Cooldown finished");
        true
    }

    /// Number of cooldowns applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}
