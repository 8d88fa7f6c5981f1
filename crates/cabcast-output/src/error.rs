//! Error types for export and reporting.

use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A feature column is absent from the frame.
    #[error("Missing column '{0}' in feature table")]
    MissingColumn(String),

    /// A cell that must be defined is null.
    #[error("Undefined value in column '{column}' at row {row}")]
    UndefinedValue {
        /// Column holding the null
        column: String,
        /// Row index within the frame
        row: usize,
    },

    /// Unknown export format name.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
