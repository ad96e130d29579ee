//! API client metrics.
//!
//! Request counters by operation and status, latency histograms and retry
//! counters. Emitted through the `metrics` facade; nothing is recorded
//! unless the host process installs a recorder.

use std::future::Future;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{info_span, Instrument};

use crate::error::ClientResult;

/// Metric name constants for consistency.
pub mod names {
    /// Total API requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "recfinder_api_requests_total";

    /// Total retry attempts by operation.
    pub const RETRIES_TOTAL: &str = "recfinder_api_retries_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "recfinder_api_latency_seconds";

    /// Recording records returned by detail fetches.
    pub const RECORDINGS_FETCHED_TOTAL: &str = "recfinder_recordings_fetched_total";
}

/// Record metrics for a completed API request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a retry attempt.
pub fn record_retry(operation: &str) {
    counter!(
        names::RETRIES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}

/// Record how many recordings a detail fetch produced.
pub fn record_recordings_fetched(count: usize) {
    counter!(names::RECORDINGS_FETCHED_TOTAL).increment(count as u64);
}

/// Run one API request inside a tracing span and record its outcome.
pub(crate) async fn observe<T, F>(operation: &str, fut: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    let span = info_span!("api_request", operation = %operation);

    let start = Instant::now();
    let result = fut.instrument(span).await;
    let latency_ms = start.elapsed().as_millis() as f64;

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.http_status().unwrap_or(0),
    };
    record_request(operation, status, latency_ms);

    result
}
