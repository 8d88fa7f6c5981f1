//! Pipeline-level errors.

use thiserror::Error;

/// Errors from any pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or cleaning trips failed
    #[error("Data error: {0}")]
    Data(#[from] cabcast_data::DataError),

    /// Aggregation or feature building failed
    #[error("Feature error: {0}")]
    Feature(#[from] cabcast_features::FeatureError),

    /// Splitting failed
    #[error("Split error: {0}")]
    Split(#[from] cabcast_split::SplitError),

    /// Writing results failed
    #[error("Export error: {0}")]
    Export(#[from] cabcast_output::ExportError),

    /// Polars error while materializing a stage
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for a pipeline configuration
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn collect_missing() -> Result<DataFrame> {
        let df = df!("a" => [1i64, 2]).unwrap();
        Ok(df.lazy().select([col("b")]).collect()?)
    }

    #[test]
    fn test_polars_errors_convert() {
        let err = collect_missing().unwrap_err();
        assert!(matches!(err, PipelineError::Polars(_)));
        assert!(err.to_string().starts_with("Polars error"));
    }
}
