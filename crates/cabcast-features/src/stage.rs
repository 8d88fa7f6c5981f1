//! The stage abstraction shared by every feature transform.

use crate::error::{FeatureError, Result};
use polars::prelude::*;
use tracing::debug;

/// A lazy transform that widens (or, for the row filter, narrows) a zone-hour table.
///
/// Stages never reorder semantics across zones: every windowed computation is
/// evaluated per `zone_id`.
pub trait FeatureStage {
    /// Stage name used in logs and errors.
    fn name(&self) -> &str;

    /// Columns the stage reads.
    fn required_columns(&self) -> Vec<&str>;

    /// Columns the stage adds.
    fn produced_columns(&self) -> Vec<String>;

    /// Apply the stage to a lazy frame.
    fn apply(&self, data: LazyFrame) -> Result<LazyFrame>;
}

/// Check a stage's inputs against the plan's schema, then apply it.
pub fn run_stage(stage: &dyn FeatureStage, mut data: LazyFrame) -> Result<LazyFrame> {
    let schema = data.collect_schema()?;
    if let Some(missing) = stage
        .required_columns()
        .into_iter()
        .find(|column| !schema.contains(column))
    {
        return Err(FeatureError::MissingColumn {
            column: missing.to_string(),
            stage: stage.name().to_string(),
        });
    }
    debug!(stage = stage.name(), adds = ?stage.produced_columns(), "applying feature stage");
    stage.apply(data)
}

/// Check a materialized frame for columns, naming the first one missing.
pub fn require_columns(df: &DataFrame, columns: &[&str], context: &str) -> Result<()> {
    match columns.iter().find(|c| df.column(c).is_err()) {
        Some(missing) => Err(FeatureError::MissingColumn {
            column: (*missing).to_string(),
            stage: context.to_string(),
        }),
        None => Ok(()),
    }
}
