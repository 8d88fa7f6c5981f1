//! Zone Statistics Annotator
//!
//! Broadcasts three per-zone means onto every row of the zone:
//! `zone_avg_fare`, `zone_avg_distance` and `zone_avg_demand`.
//!
//! In [`ZoneStatsMode::Global`] the means cover the whole snapshot, including
//! hours after the row being annotated. That leaks future information into
//! early rows and must only be read as a static zone identity feature.
//! [`ZoneStatsMode::TrainOnly`] fits the means on the training split and
//! reuses them for validation and test.

use crate::columns::{
    AVG_DISTANCE, AVG_FARE, PICKUP_COUNT, PICKUP_HOUR, ZONE_AVG_DEMAND, ZONE_AVG_DISTANCE,
    ZONE_AVG_FARE, ZONE_ID,
};
use crate::error::{FeatureError, Result};
use crate::stage::{FeatureStage, require_columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which rows zone summaries are computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneStatsMode {
    /// Whole snapshot, before the split (leakage-prone)
    #[default]
    Global,
    /// Training split only, broadcast onto every split
    TrainOnly,
}

impl ZoneStatsMode {
    /// Name as used in configuration files and on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::TrainOnly => "train-only",
        }
    }
}

impl fmt::Display for ZoneStatsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneStatsMode {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "global" => Ok(Self::Global),
            "train-only" | "train" => Ok(Self::TrainOnly),
            other => Err(FeatureError::InvalidConfig(format!(
                "unknown zone statistics mode '{other}'"
            ))),
        }
    }
}

fn zone_mean_exprs() -> [Expr; 3] {
    [
        col(AVG_FARE).mean().alias(ZONE_AVG_FARE),
        col(AVG_DISTANCE).mean().alias(ZONE_AVG_DISTANCE),
        col(PICKUP_COUNT)
            .cast(DataType::Float64)
            .mean()
            .alias(ZONE_AVG_DEMAND),
    ]
}

/// Whole-snapshot zone means, as a window expression over `zone_id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZoneStatistics;

impl FeatureStage for ZoneStatistics {
    fn name(&self) -> &str {
        "zone_statistics"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![ZONE_ID, PICKUP_COUNT, AVG_FARE, AVG_DISTANCE]
    }

    fn produced_columns(&self) -> Vec<String> {
        [ZONE_AVG_FARE, ZONE_AVG_DISTANCE, ZONE_AVG_DEMAND]
            .iter()
            .map(|c| (*c).to_string())
            .collect()
    }

    fn apply(&self, data: LazyFrame) -> Result<LazyFrame> {
        let windowed: Vec<Expr> = zone_mean_exprs()
            .into_iter()
            .map(|e| e.over([col(ZONE_ID)]))
            .collect();
        Ok(data.with_columns(windowed))
    }
}

/// Zone means fitted on a reference frame and joined onto other frames.
///
/// Zones absent from the reference get the reference-wide means, so no row is
/// left without a value and nothing outside the reference is consulted.
#[derive(Debug, Clone)]
pub struct ZoneSummary {
    table: DataFrame,
    fallback: [f64; 3],
}

impl ZoneSummary {
    /// Fit per-zone means on `reference`.
    pub fn fit(reference: &DataFrame) -> Result<Self> {
        require_columns(
            reference,
            &[ZONE_ID, PICKUP_COUNT, AVG_FARE, AVG_DISTANCE],
            "zone summary",
        )?;
        if reference.height() == 0 {
            return Err(FeatureError::EmptyInput(
                "zone summary needs at least one reference row".to_string(),
            ));
        }

        let table = reference
            .clone()
            .lazy()
            .group_by_stable([col(ZONE_ID)])
            .agg(zone_mean_exprs())
            .sort([ZONE_ID], Default::default())
            .collect()?;

        let overall = reference.clone().lazy().select(zone_mean_exprs()).collect()?;
        let scalar = |name: &str| -> Result<f64> {
            Ok(overall.column(name)?.f64()?.get(0).unwrap_or(f64::NAN))
        };
        let fallback = [
            scalar(ZONE_AVG_FARE)?,
            scalar(ZONE_AVG_DISTANCE)?,
            scalar(ZONE_AVG_DEMAND)?,
        ];

        debug!(zones = table.height(), ?fallback, "fitted zone summary");
        Ok(Self { table, fallback })
    }

    /// Number of zones seen in the reference frame.
    pub fn zone_count(&self) -> usize {
        self.table.height()
    }

    /// Means used for zones missing from the reference frame.
    pub const fn fallback(&self) -> [f64; 3] {
        self.fallback
    }

    /// Join the fitted means onto `data`, replacing any existing summary columns.
    pub fn annotate(&self, mut data: LazyFrame) -> Result<LazyFrame> {
        let [fare, distance, demand] = self.fallback;
        let schema = data.collect_schema()?;
        let stale: Vec<&str> = [ZONE_AVG_FARE, ZONE_AVG_DISTANCE, ZONE_AVG_DEMAND]
            .into_iter()
            .filter(|c| schema.contains(c))
            .collect();
        if !stale.is_empty() {
            data = data.drop(stale);
        }
        let result = data
            .join(
                self.table.clone().lazy(),
                [col(ZONE_ID)],
                [col(ZONE_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .with_columns([
                col(ZONE_AVG_FARE).fill_null(lit(fare)),
                col(ZONE_AVG_DISTANCE).fill_null(lit(distance)),
                col(ZONE_AVG_DEMAND).fill_null(lit(demand)),
            ])
            .sort([ZONE_ID, PICKUP_HOUR], Default::default());
        Ok(result)
    }
}
