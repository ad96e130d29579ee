//! Recording export files and identifier input.
//!
//! - [`IncrementalExporter`]: append-only CSV output, header written once
//! - [`resolve_identifiers`]: conversation IDs from CSV or Excel files

pub mod error;
pub mod exporter;
pub mod input;

pub use error::{ExportError, ExportResult};
pub use exporter::IncrementalExporter;
pub use input::{resolve_identifiers, ID_COLUMNS};
