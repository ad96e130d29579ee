//! Runner configuration.

use std::path::PathBuf;

use crate::error::{RunnerError, RunnerResult};

pub const DEFAULT_MAX_IDENTIFIERS: usize = 800;
pub const DEFAULT_LOG_FILE: &str = "genesys_retrieval.log";
pub const DEFAULT_INPUT_FILE: &str = "call_ids.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "recording_ids.csv";

/// Settings for a single run, outside of the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Identifier-list runs process at most this many identifiers.
    pub max_identifiers: usize,
    /// Append-only log file. `None` disables file logging.
    pub log_file: Option<PathBuf>,
    /// JSON console output instead of human-readable lines.
    pub json_logs: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_identifiers: DEFAULT_MAX_IDENTIFIERS,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            json_logs: false,
        }
    }
}

impl RunnerConfig {
    /// Create config from environment variables.
    ///
    /// An unparsable `RECFINDER_MAX_IDS` is rejected rather than ignored.
    pub fn from_env() -> RunnerResult<Self> {
        let max_identifiers = match std::env::var("RECFINDER_MAX_IDS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                RunnerError::config(format!("RECFINDER_MAX_IDS must be a number, got {:?}", raw))
            })?,
            Err(_) => DEFAULT_MAX_IDENTIFIERS,
        };

        let log_file = match std::env::var("RECFINDER_LOG_FILE") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        };

        let json_logs = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            max_identifiers,
            log_file,
            json_logs,
        })
    }
}
