//! Rolling mean features
//!
//! `rolling_{w}h_mean` averages the `w` samples preceding the current row in
//! the zone's sequence. The current row is excluded so the feature never sees
//! its own target. Windows are clipped to available history: one prior sample
//! is enough, zero yields null.

use crate::columns::{PICKUP_COUNT, PICKUP_HOUR, ZONE_ID, rolling_mean_column};
use crate::error::Result;
use crate::stage::FeatureStage;
use polars::prelude::*;

/// Per-zone trailing means of the target.
#[derive(Debug, Clone)]
pub struct RollingFeatures {
    windows: Vec<usize>,
}

impl RollingFeatures {
    /// Create a rolling stage for the given window sizes.
    pub const fn new(windows: Vec<usize>) -> Self {
        Self { windows }
    }

    /// Configured window sizes.
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }
}

impl Default for RollingFeatures {
    fn default() -> Self {
        Self::new(vec![3, 24])
    }
}

impl FeatureStage for RollingFeatures {
    fn name(&self) -> &str {
        "rolling"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![ZONE_ID, PICKUP_HOUR, PICKUP_COUNT]
    }

    fn produced_columns(&self) -> Vec<String> {
        self.windows.iter().map(|&w| rolling_mean_column(w)).collect()
    }

    fn apply(&self, data: LazyFrame) -> Result<LazyFrame> {
        let means: Vec<Expr> = self
            .windows
            .iter()
            .map(|&w| {
                col(PICKUP_COUNT)
                    .cast(DataType::Float64)
                    .shift(lit(1))
                    .rolling_mean(RollingOptionsFixedWindow {
                        window_size: w,
                        min_periods: 1,
                        ..Default::default()
                    })
                    .over([col(ZONE_ID)])
                    .alias(rolling_mean_column(w))
            })
            .collect();

        let result = data
            .sort([ZONE_ID, PICKUP_HOUR], Default::default())
            .with_columns(means);

        Ok(result)
    }
}
