//! Runner error types.

use thiserror::Error;

use recfinder_client::ClientError;
use recfinder_export::ExportError;
use recfinder_models::IntervalError;

pub type RunnerResult<T> = Result<T, RunnerError>;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API client error: {0}")]
    Client(#[from] ClientError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Invalid date range: {0}")]
    InvalidDate(#[from] IntervalError),
}

impl RunnerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
