//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for export and input operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while writing export files or reading identifier files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input format error: {0}")]
    InputFormat(String),

    #[error("Unsupported input file: {}", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),
}

impl ExportError {
    pub fn input_format(msg: impl Into<String>) -> Self {
        Self::InputFormat(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_input_names_path() {
        let err = ExportError::UnsupportedInput(PathBuf::from("ids.json"));
        assert_eq!(err.to_string(), "Unsupported input file: ids.json");
    }

    #[test]
    fn test_io_conversion() {
        let err: ExportError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
