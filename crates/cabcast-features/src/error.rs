//! Error types for feature construction.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while building features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A stage's input lacks a column it reads
    #[error("Missing required column '{column}' for {stage}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
        /// Stage that needed it
        stage: String,
    },

    /// Nothing to build features from
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Invalid lag or window configuration
    #[error("Invalid feature configuration: {0}")]
    InvalidConfig(String),

    /// Polars computation error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Trip data error
    #[error("Data error: {0}")]
    Data(#[from] cabcast_data::DataError),
}
