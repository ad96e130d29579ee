//! Recording export runner.
//!
//! Wires the API client to the CSV exporter for the two retrieval modes
//! (date range and identifier list) and hosts the logging and CLI setup
//! used by the `recfinder` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod id_export;
pub mod logging;
pub mod lookup;
pub mod range_export;

pub use cli::{Cli, Command};
pub use config::RunnerConfig;
pub use error::{RunnerError, RunnerResult};
pub use id_export::{export_identifiers, IdExportSummary};
pub use logging::{init_tracing, RunLogger};
pub use range_export::{export_time_range, RangeExportSummary};
