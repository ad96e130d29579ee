//! Identifier file input.
//!
//! Accepts CSV (unknown encoding and delimiter) or Excel workbooks and
//! returns the values of the first recognized identifier column.

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{debug, info, warn};

use crate::error::{ExportError, ExportResult};

/// Recognized identifier column names, highest priority first.
pub const ID_COLUMNS: [&str; 9] = [
    "conversation_id",
    "Call ID",
    "call_id",
    "CallID",
    "ID",
    "id",
    "Recording ID",
    "recording_id",
    "RecordingID",
];

/// Encodings tried for CSV input. Windows-1252 also covers latin-1.
const ENCODINGS: [&Encoding; 2] = [UTF_8, WINDOWS_1252];

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Read conversation identifiers from a `.csv`, `.xls` or `.xlsx` file.
///
/// Values are trimmed; blank cells are skipped. Order follows the file.
pub fn resolve_identifiers(path: impl AsRef<Path>) -> ExportResult<Vec<String>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let ids = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("xls") | Some("xlsx") => read_excel(path)?,
        _ => return Err(ExportError::UnsupportedInput(path.to_path_buf())),
    };

    info!(path = %path.display(), count = ids.len(), "Resolved identifiers");
    Ok(ids)
}

/// Index of the highest-priority recognized column in `header`.
fn find_id_column<S: AsRef<str>>(header: &[S]) -> Option<(usize, &'static str)> {
    ID_COLUMNS.iter().find_map(|wanted| {
        header
            .iter()
            .position(|name| name.as_ref() == *wanted)
            .map(|idx| (idx, *wanted))
    })
}

fn missing_column_error<S: AsRef<str>>(header: &[S]) -> ExportError {
    let available: Vec<&str> = header.iter().map(|s| s.as_ref()).collect();
    ExportError::input_format(format!(
        "could not find a call/recording ID column, available columns: {:?}",
        available
    ))
}

fn push_value(ids: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        ids.push(value.to_string());
    }
}

fn read_csv(path: &Path) -> ExportResult<Vec<String>> {
    let bytes = fs::read(path)?;
    let mut first_header: Option<Vec<String>> = None;

    for encoding in ENCODINGS {
        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(&bytes)
        else {
            debug!(encoding = encoding.name(), "CSV input does not decode");
            continue;
        };
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        for delimiter in DELIMITERS {
            match read_csv_column(text, delimiter) {
                Ok(CsvAttempt::Found { column, ids }) => {
                    info!(
                        encoding = encoding.name(),
                        delimiter = %char::from(delimiter).escape_default(),
                        column,
                        "Read CSV input"
                    );
                    return Ok(ids);
                }
                Ok(CsvAttempt::NoColumn(header)) => {
                    if first_header.is_none() {
                        first_header = Some(header);
                    }
                }
                Err(e) => {
                    debug!(
                        encoding = encoding.name(),
                        delimiter = %char::from(delimiter).escape_default(),
                        error = %e,
                        "CSV attempt failed"
                    );
                }
            }
        }
    }

    match first_header {
        Some(header) => Err(missing_column_error(&header)),
        None => Err(ExportError::input_format(format!(
            "could not read {} with any supported encoding and delimiter",
            path.display()
        ))),
    }
}

enum CsvAttempt {
    Found { column: &'static str, ids: Vec<String> },
    NoColumn(Vec<String>),
}

fn read_csv_column(text: &str, delimiter: u8) -> ExportResult<CsvAttempt> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let Some((index, column)) = find_id_column(&header) else {
        return Ok(CsvAttempt::NoColumn(header));
    };

    let mut ids = Vec::new();
    for (line, row) in reader.records().enumerate() {
        match row {
            Ok(row) => {
                if let Some(value) = row.get(index) {
                    push_value(&mut ids, value);
                }
            }
            // Malformed rows are skipped, matching a lenient reader.
            Err(e) => warn!(row = line + 2, error = %e, "Skipping malformed CSV row"),
        }
    }

    Ok(CsvAttempt::Found { column, ids })
}

fn read_excel(path: &Path) -> ExportResult<Vec<String>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExportError::input_format(format!("{} has no worksheets", path.display())))??;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
        .unwrap_or_default();

    let (index, column) = find_id_column(&header).ok_or_else(|| missing_column_error(&header))?;
    debug!(column, "Reading identifiers from first worksheet");

    let mut ids = Vec::new();
    for row in rows {
        if let Some(cell) = row.get(index) {
            push_value(&mut ids, &cell_text(cell));
        }
    }
    Ok(ids)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Numeric IDs come back as floats; drop a zero fraction.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_comma_csv_with_conversation_id() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ids.csv", b"conversation_id,notes\nabc,x\n def ,y\n,z\n");
        assert_eq!(resolve_identifiers(&path).unwrap(), vec!["abc", "def"]);
    }

    #[test]
    fn test_semicolon_csv_is_detected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ids.csv", b"Name;Call ID\nAlex;c-1\nSam;c-2\n");
        assert_eq!(resolve_identifiers(&path).unwrap(), vec!["c-1", "c-2"]);
    }

    #[test]
    fn test_tab_and_pipe_delimiters() {
        let dir = TempDir::new().unwrap();
        let tab = write_file(&dir, "tab.csv", b"CallID\tother\nt1\tx\n");
        let pipe = write_file(&dir, "pipe.csv", b"other|RecordingID\nx|p1\n");
        assert_eq!(resolve_identifiers(&tab).unwrap(), vec!["t1"]);
        assert_eq!(resolve_identifiers(&pipe).unwrap(), vec!["p1"]);
    }

    #[test]
    fn test_column_priority_follows_list_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ids.csv", b"id,call_id\nlow,high\n");
        assert_eq!(resolve_identifiers(&path).unwrap(), vec!["high"]);
    }

    #[test]
    fn test_latin1_bytes_fall_back_to_windows_1252() {
        let dir = TempDir::new().unwrap();
        // 0xE9 is 'é' in latin-1 and invalid as a lone UTF-8 byte.
        let path = write_file(&dir, "ids.csv", b"Agent,ID\nRen\xe9,x1\n");
        assert_eq!(resolve_identifiers(&path).unwrap(), vec!["x1"]);
    }

    #[test]
    fn test_utf8_bom_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ids.csv", b"\xef\xbb\xbfconversation_id\nb1\n");
        assert_eq!(resolve_identifiers(&path).unwrap(), vec!["b1"]);
    }

    #[test]
    fn test_missing_column_lists_available() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ids.csv", b"foo,bar\n1,2\n");
        let err = resolve_identifiers(&path).unwrap_err();
        assert!(matches!(err, ExportError::InputFormat(_)));
        let msg = err.to_string();
        assert!(msg.contains("foo"), "{msg}");
        assert!(msg.contains("bar"), "{msg}");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "ids.json", b"[]");
        assert!(matches!(
            resolve_identifiers(&path),
            Err(ExportError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_missing_csv_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_identifiers(dir.path().join("nope.csv")),
            Err(ExportError::Io(_))
        ));
    }

    #[test]
    fn test_cell_text_renders_integral_floats() {
        assert_eq!(cell_text(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_text(&Data::String("abc".into())), "abc");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_find_id_column() {
        assert_eq!(find_id_column(&["x", "Call ID"][..]), Some((1, "Call ID")));
        assert_eq!(find_id_column(&["call id"][..]), None);
    }
}
