//! Export Error Types

use std::io;
use thiserror::Error;

/// Errors raised while loading, selecting, serializing or exporting catalogs
#[derive(Error, Debug)]
pub enum ExportError {
    /// A schema column is absent from the dataset
    #[error("Column '{column}' is required by the schema but missing from the dataset")]
    SchemaMismatch { column: String },

    /// Columns disagree in length
    #[error("Column '{column}' has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// No download mechanism is usable in this environment
    #[error("No file save mechanism available: {0}")]
    PlatformUnsupported(String),

    /// A string value would break the CSV framing
    #[error("Value in column '{column}' at row {row} contains a delimiter, quote or newline")]
    UnrepresentableField { column: String, row: usize },

    /// Schema definition is malformed
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Selection text could not be parsed
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Catalog input has the wrong shape
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Catalog column type has no scalar mapping
    #[error("Column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
