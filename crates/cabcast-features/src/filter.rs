//! Row filter: the single gate that drops incomplete feature rows.
//!
//! A row survives only when every lag column is defined. Rolling means are
//! undefined only on a zone's first sample, where `lag_1h` (and any other lag)
//! is undefined too, so they need no separate check.

use crate::error::Result;
use crate::stage::FeatureStage;
use polars::prelude::*;

/// Drops rows with a null in any of the configured lag columns.
#[derive(Debug, Clone)]
pub struct RowFilter {
    columns: Vec<String>,
}

impl RowFilter {
    /// Filter on the given lag columns.
    pub const fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// The predicate keeping complete rows.
    pub fn predicate(&self) -> Expr {
        self.columns
            .iter()
            .map(|c| col(c.as_str()).is_not_null())
            .reduce(|all, next| all.and(next))
            .unwrap_or_else(|| lit(true))
    }
}

impl FeatureStage for RowFilter {
    fn name(&self) -> &str {
        "row_filter"
    }

    fn required_columns(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    fn produced_columns(&self) -> Vec<String> {
        Vec::new()
    }

    fn apply(&self, data: LazyFrame) -> Result<LazyFrame> {
        Ok(data.filter(self.predicate()))
    }
}
