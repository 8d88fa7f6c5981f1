//! Error types for temporal splitting.

use thiserror::Error;

/// Errors that can occur while splitting a feature table.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Negative ratio, NaN, or ratios summing above one
    #[error("Invalid split ratios: train={train}, val={val} ({reason})")]
    InvalidRatio {
        /// Train ratio as given
        train: f64,
        /// Validation ratio as given
        val: f64,
        /// What is wrong with them
        reason: &'static str,
    },

    /// No rows, hence no hours to cut
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The table has no hour column
    #[error("Missing column '{0}' in feature table")]
    MissingColumn(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result type for splitting.
pub type Result<T> = std::result::Result<T, SplitError>;
