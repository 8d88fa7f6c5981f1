//! Lag features
//!
//! `lag_{k}h` is the `pickup_count` found `k` positions earlier in the zone's
//! own sequence of samples. When a zone has no trips in some hour that hour is
//! missing from the sequence, so the lag reaches further back in wall-clock
//! time. Rows with fewer than `k` predecessors get a null lag.

use crate::columns::{PICKUP_COUNT, PICKUP_HOUR, ZONE_ID, lag_column};
use crate::error::Result;
use crate::stage::FeatureStage;
use polars::prelude::*;

/// Per-zone shifted copies of the target.
#[derive(Debug, Clone)]
pub struct LagFeatures {
    lags: Vec<usize>,
}

impl LagFeatures {
    /// Create a lag stage for the given offsets.
    pub const fn new(lags: Vec<usize>) -> Self {
        Self { lags }
    }

    /// Configured offsets.
    pub fn lags(&self) -> &[usize] {
        &self.lags
    }
}

impl Default for LagFeatures {
    fn default() -> Self {
        Self::new(vec![1, 2, 24])
    }
}

impl FeatureStage for LagFeatures {
    fn name(&self) -> &str {
        "lag"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![ZONE_ID, PICKUP_HOUR, PICKUP_COUNT]
    }

    fn produced_columns(&self) -> Vec<String> {
        self.lags.iter().map(|&k| lag_column(k)).collect()
    }

    fn apply(&self, data: LazyFrame) -> Result<LazyFrame> {
        let lags: Vec<Expr> = self
            .lags
            .iter()
            .map(|&k| {
                col(PICKUP_COUNT)
                    .shift(lit(k as i64))
                    .over([col(ZONE_ID)])
                    .alias(lag_column(k))
            })
            .collect();

        let result = data
            .sort([ZONE_ID, PICKUP_HOUR], Default::default())
            .with_columns(lags);

        Ok(result)
    }
}
