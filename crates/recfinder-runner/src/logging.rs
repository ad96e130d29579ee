//! Logging setup and structured run logging.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::RunnerConfig;

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,rustls=warn";

/// Install the global subscriber: console output plus an optional
/// append-only log file without ANSI colors.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(config: &RunnerConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match &config.log_file {
        Some(path) => Some(file_layer(path)?),
        None => None,
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    if config.json_logs {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()?;
    }

    Ok(())
}

fn file_layer<S>(path: &Path) -> anyhow::Result<impl tracing_subscriber::Layer<S>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file)))
}

/// Run logger for consistent lifecycle messages.
///
/// Every line carries the run mode (`range`, `ids`) and its scope, such as
/// the date range or the input file.
#[derive(Debug, Clone)]
pub struct RunLogger {
    mode: String,
    scope: String,
}

impl RunLogger {
    /// Create a run logger.
    ///
    /// # Arguments
    /// * `mode` - The retrieval mode (e.g., "range", "ids")
    /// * `scope` - What the run covers, such as the query interval or output file
    pub fn new(mode: &str, scope: impl Into<String>) -> Self {
        Self {
            mode: mode.to_string(),
            scope: scope.into(),
        }
    }

    /// Log the start of a run.
    pub fn log_start(&self, message: &str) {
        info!(mode = %self.mode, scope = %self.scope, "Run started: {}", message);
    }

    /// Log a progress update during the run.
    pub fn log_progress(&self, message: &str) {
        info!(mode = %self.mode, scope = %self.scope, "Run progress: {}", message);
    }

    /// Log a recoverable problem during the run.
    pub fn log_warning(&self, message: &str) {
        warn!(mode = %self.mode, scope = %self.scope, "Run warning: {}", message);
    }

    /// Log a failure during the run.
    pub fn log_error(&self, message: &str) {
        error!(mode = %self.mode, scope = %self.scope, "Run error: {}", message);
    }

    /// Log the end of a run.
    pub fn log_completion(&self, message: &str) {
        info!(mode = %self.mode, scope = %self.scope, "Run completed: {}", message);
    }

    /// Get the run mode.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Get the run scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Span that groups all events of this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("run", mode = %self.mode, scope = %self.scope)
    }
}
