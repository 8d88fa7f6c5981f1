//! Split ratio configuration.

use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};

/// Slack for ratio sums such as `0.7 + 0.3` that overshoot one in binary.
const SUM_TOLERANCE: f64 = 1e-9;

/// Shares of distinct hours given to train and validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of distinct hours for training (default: 0.70)
    pub train_ratio: f64,
    /// Share of distinct hours for validation (default: 0.15)
    pub val_ratio: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.70,
            val_ratio: 0.15,
        }
    }
}

impl SplitConfig {
    /// Create a validated configuration.
    pub fn new(train_ratio: f64, val_ratio: f64) -> Result<Self> {
        let config = Self {
            train_ratio,
            val_ratio,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject negative or NaN ratios and sums above one.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason| SplitError::InvalidRatio {
            train: self.train_ratio,
            val: self.val_ratio,
            reason,
        };

        if self.train_ratio.is_nan() || self.val_ratio.is_nan() {
            return Err(invalid("ratios must be numbers"));
        }
        if self.train_ratio < 0.0 || self.val_ratio < 0.0 {
            return Err(invalid("ratios must be non-negative"));
        }
        if self.train_ratio + self.val_ratio > 1.0 + SUM_TOLERANCE {
            return Err(invalid("train + val must not exceed 1"));
        }
        Ok(())
    }

    /// Remaining share for test, `1 - train - val`.
    pub fn test_ratio(&self) -> f64 {
        (1.0 - self.train_ratio - self.val_ratio).max(0.0)
    }
}
