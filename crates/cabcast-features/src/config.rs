//! Feature builder configuration.

use crate::columns::{lag_column, rolling_mean_column};
use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};

/// Which lag and rolling features to derive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Lag offsets in samples (default: 1, 2, 24)
    pub lags: Vec<usize>,
    /// Rolling mean windows in samples (default: 3, 24)
    pub rolling_windows: Vec<usize>,
    /// Fill each zone's gaps with zero-demand hours before windowing
    /// (default: false, lags skip over missing hours)
    pub reindex_hourly: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lags: vec![1, 2, 24],
            rolling_windows: vec![3, 24],
            reindex_hourly: false,
        }
    }
}

impl FeatureConfig {
    /// Check that lags and windows are positive and distinct.
    ///
    /// At least one lag is required: the row filter keys on lag columns.
    pub fn validate(&self) -> Result<()> {
        if self.lags.is_empty() {
            return Err(FeatureError::InvalidConfig(
                "at least one lag is required".to_string(),
            ));
        }
        check_positive_distinct("lag", &self.lags)?;
        check_positive_distinct("rolling window", &self.rolling_windows)
    }

    /// Largest lag; a zone needs more samples than this to keep any row.
    pub fn max_lag(&self) -> usize {
        self.lags.iter().copied().max().unwrap_or(0)
    }

    /// Lag column names, in configured order.
    pub fn lag_columns(&self) -> Vec<String> {
        self.lags.iter().map(|&k| lag_column(k)).collect()
    }

    /// Rolling mean column names, in configured order.
    pub fn rolling_columns(&self) -> Vec<String> {
        self.rolling_windows
            .iter()
            .map(|&w| rolling_mean_column(w))
            .collect()
    }
}

fn check_positive_distinct(what: &str, values: &[usize]) -> Result<()> {
    if values.contains(&0) {
        return Err(FeatureError::InvalidConfig(format!("{what} must be positive")));
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != values.len() {
        return Err(FeatureError::InvalidConfig(format!(
            "duplicate {what} in {values:?}"
        )));
    }
    Ok(())
}
