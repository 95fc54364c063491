//! Error types for the sheetlens library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sheetlens operations.
#[derive(Debug, Error)]
pub enum SheetlensError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the spreadsheet reader.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The sheet has no usable header row or no rows at all.
    #[error("Cannot read this sheet: {0}")]
    MalformedSheet(String),

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// A selected field is not a header of the data table.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The summarization collaborator failed.
    #[error("Summary error: {0}")]
    Summary(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<calamine::Error> for SheetlensError {
    fn from(err: calamine::Error) -> Self {
        SheetlensError::Spreadsheet(err.to_string())
    }
}

/// Result type alias for sheetlens operations.
pub type Result<T> = std::result::Result<T, SheetlensError>;
