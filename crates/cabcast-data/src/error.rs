//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required column is absent from an input frame
    #[error("Missing required column '{column}' in {context}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
        /// Which input was being read
        context: String,
    },

    /// No rows to work with
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Filter bounds are inconsistent
    #[error("Invalid trip filter: {0}")]
    InvalidFilter(String),

    /// Input file type is not recognised
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
