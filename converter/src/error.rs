//! Error types for the gateway table converter.
//!
//! - [`InputError`] - Reading and decoding the CSV project file
//! - [`RowParseError`] - A data row without one of the required fields
//! - [`WriteError`] - Serializing or writing the routing table
//! - [`ReadTableError`] - Loading an existing routing table for inspection
//! - [`ConvertError`] - Top-level conversion errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading the CSV project file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Input path does not exist.
    #[error("csv file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content could not be decoded.
    #[error("failed to decode input: {0}")]
    Encoding(String),
}

// =============================================================================
// Row Errors
// =============================================================================

/// Why a required field could not be taken from a data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingField {
    /// The column name is not part of the header.
    NotInHeader(&'static str),
    /// The column exists but the row has too few fields to reach it.
    OutOfRange {
        column: &'static str,
        position: usize,
        fields: usize,
    },
}

impl MissingField {
    /// Name of the required column.
    pub fn column(&self) -> &'static str {
        match self {
            MissingField::NotInHeader(column) => column,
            MissingField::OutOfRange { column, .. } => column,
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::NotInHeader(column) => {
                write!(f, "column '{}' is not in the header", column)
            }
            MissingField::OutOfRange {
                column,
                position,
                fields,
            } => write!(
                f,
                "column '{}' is at position {} but the row has {} field(s)",
                column, position, fields
            ),
        }
    }
}

/// A data row is missing at least one required field.
///
/// Fatal for the whole conversion: no partial table is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {}", format_missing(.missing))]
pub struct RowParseError {
    /// 1-based line number in the input file (the header is line 1).
    pub line: usize,
    /// Every required field that could not be extracted.
    pub missing: Vec<MissingField>,
}

fn format_missing(missing: &[MissingField]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl RowParseError {
    /// Whether the failure comes from the header rather than the row itself.
    pub fn is_missing_column(&self) -> bool {
        self.missing
            .iter()
            .any(|m| matches!(m, MissingField::NotInHeader(_)))
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the routing table document.
#[derive(Debug, Error)]
pub enum WriteError {
    /// JSON serialization failed.
    #[error("failed to serialize routing table: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Temporary file could not be created or written.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The completed document could not be moved into place.
    #[error("failed to replace '{}': {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while loading an existing routing table.
#[derive(Debug, Error)]
pub enum ReadTableError {
    /// Failed to read file.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a routing table document.
    #[error("invalid routing table '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion errors returned by the pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file error.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Data row error.
    #[error("csv file parsing error: {0}")]
    Row(#[from] RowParseError),

    /// Output error.
    #[error("output error: {0}")]
    Write(#[from] WriteError),

    /// Existing table error.
    #[error("table error: {0}")]
    ReadTable(#[from] ReadTableError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for output operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // RowParseError -> ConvertError
        let row_err = RowParseError {
            line: 4,
            missing: vec![MissingField::NotInHeader("mqtt values")],
        };
        let convert_err: ConvertError = row_err.into();
        let msg = convert_err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("mqtt values"));

        // InputError -> ConvertError
        let input_err = InputError::NotFound(PathBuf::from("/tmp/none.csv"));
        let convert_err: ConvertError = input_err.into();
        assert!(convert_err.to_string().contains("/tmp/none.csv"));
    }

    #[test]
    fn test_row_error_lists_every_field() {
        let err = RowParseError {
            line: 7,
            missing: vec![
                MissingField::OutOfRange {
                    column: "mqtt topic",
                    position: 2,
                    fields: 2,
                },
                MissingField::OutOfRange {
                    column: "mqtt values",
                    position: 3,
                    fields: 2,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 7: "));
        assert!(msg.contains("'mqtt topic' is at position 2"));
        assert!(msg.contains("'mqtt values' is at position 3"));
        assert!(!err.is_missing_column());
    }

    #[test]
    fn test_missing_column_detection() {
        let err = RowParseError {
            line: 2,
            missing: vec![MissingField::NotInHeader("operation")],
        };
        assert!(err.is_missing_column());
        assert_eq!(err.missing[0].column(), "operation");
    }
}
