//! Feature Builder
//!
//! Runs the stage chain over a complete zone-hour snapshot:
//! (reindex) → calendar → lag → rolling → (zone statistics) → row filter.
//! Output rows are sorted by `(zone_id, pickup_hour)` and columns follow the
//! registry order.

use crate::calendar::CalendarFeatures;
use crate::columns::{
    AVG_DISTANCE, AVG_FARE, HOURLY_COLUMNS, PICKUP_COUNT, PICKUP_HOUR, ZONE_ID,
    ZONE_SUMMARY_COLUMNS,
};
use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use crate::filter::RowFilter;
use crate::grid::HourlyGrid;
use crate::lag::LagFeatures;
use crate::registry::feature_columns;
use crate::rolling::RollingFeatures;
use crate::stage::{FeatureStage, require_columns, run_stage};
use crate::zone_stats::ZoneStatistics;
use polars::prelude::*;
use tracing::{info, warn};

/// Builds the final feature table from a zone-hour table.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    /// Create a builder, validating the configuration.
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Builder with the default lags (1, 2, 24) and windows (3, 24).
    pub fn try_default() -> Result<Self> {
        Self::new(FeatureConfig::default())
    }

    /// Active configuration.
    pub const fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Build features with whole-snapshot zone statistics.
    ///
    /// Zone means are taken over every zone-hour before the row filter runs,
    /// so they include hours later than the row they annotate.
    pub fn build(&self, hourly: DataFrame) -> Result<DataFrame> {
        self.run(hourly, true)
    }

    /// Build features without the zone summary columns.
    ///
    /// Used when zone statistics are fitted later on the training split.
    pub fn build_without_zone_stats(&self, hourly: DataFrame) -> Result<DataFrame> {
        self.run(hourly, false)
    }

    /// Output columns, in order.
    pub fn output_columns(&self, with_zone_stats: bool) -> Vec<String> {
        feature_columns(&self.config)
            .into_iter()
            .filter(|c| with_zone_stats || !ZONE_SUMMARY_COLUMNS.contains(&c.as_str()))
            .collect()
    }

    fn stages(&self, with_zone_stats: bool) -> Vec<Box<dyn FeatureStage>> {
        let mut stages: Vec<Box<dyn FeatureStage>> = vec![
            Box::new(CalendarFeatures),
            Box::new(LagFeatures::new(self.config.lags.clone())),
            Box::new(RollingFeatures::new(self.config.rolling_windows.clone())),
        ];
        if with_zone_stats {
            stages.push(Box::new(ZoneStatistics));
        }
        stages.push(Box::new(RowFilter::new(self.config.lag_columns())));
        stages
    }

    fn run(&self, hourly: DataFrame, with_zone_stats: bool) -> Result<DataFrame> {
        let hourly = self.prepare(hourly)?;
        let rows_in = hourly.height();

        let mut plan = hourly.lazy();
        for stage in self.stages(with_zone_stats) {
            plan = run_stage(stage.as_ref(), plan)?;
        }

        let columns: Vec<Expr> = self
            .output_columns(with_zone_stats)
            .iter()
            .map(|c| col(c.as_str()))
            .collect();
        let features = plan
            .select(columns)
            .sort([ZONE_ID, PICKUP_HOUR], Default::default())
            .collect()?;

        let rows_out = features.height();
        if rows_out == 0 {
            warn!(
                rows_in,
                max_lag = self.config.max_lag(),
                "no zone has enough history; feature table is empty"
            );
        }
        info!(
            rows_in,
            rows_out,
            dropped = rows_in - rows_out,
            zone_stats = with_zone_stats,
            "built feature table"
        );
        Ok(features)
    }

    /// Check the zone-hour table, normalize dtypes and optionally reindex.
    fn prepare(&self, hourly: DataFrame) -> Result<DataFrame> {
        require_columns(&hourly, &HOURLY_COLUMNS, "feature builder")?;
        if hourly.height() == 0 {
            return Err(FeatureError::EmptyInput(
                "zone-hour table has no rows".to_string(),
            ));
        }

        let normalized = hourly
            .lazy()
            .select([
                col(ZONE_ID).cast(DataType::Int32),
                col(PICKUP_HOUR).cast(DataType::Datetime(TimeUnit::Microseconds, None)),
                col(PICKUP_COUNT).cast(DataType::Int64),
                col(AVG_FARE).cast(DataType::Float64),
                col(AVG_DISTANCE).cast(DataType::Float64),
            ])
            .sort([ZONE_ID, PICKUP_HOUR], Default::default())
            .collect()?;

        if self.config.reindex_hourly {
            HourlyGrid::new().reindex(&normalized)
        } else {
            Ok(normalized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MICROS_PER_HOUR;
    use crate::columns::{ZONE_AVG_DEMAND, lag_column};
    use approx::assert_relative_eq;

    fn zone_frame(zone: i32, counts: Vec<i64>) -> DataFrame {
        let n = counts.len();
        DataFrame::new(vec![
            Series::new(ZONE_ID.into(), vec![zone; n]).into(),
            Series::new(
                PICKUP_HOUR.into(),
                (0..n as i64).map(|h| h * MICROS_PER_HOUR).collect::<Vec<_>>(),
            )
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap()
            .into(),
            Series::new(PICKUP_COUNT.into(), counts).into(),
            Series::new(AVG_FARE.into(), vec![12.5; n]).into(),
            Series::new(AVG_DISTANCE.into(), vec![2.0; n]).into(),
        ])
        .unwrap()
    }

    fn constant_zone(zone: i32, hours: usize, count: i64) -> DataFrame {
        zone_frame(zone, vec![count; hours])
    }

    #[test]
    fn test_output_columns() {
        let builder = FeatureBuilder::try_default().unwrap();
        assert_eq!(builder.output_columns(true).len(), 17);
        assert_eq!(builder.output_columns(false).len(), 14);

        let df = builder.build(constant_zone(7, 26, 5)).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, builder.output_columns(true));
    }

    #[test]
    fn test_zone_stats_cover_dropped_rows() {
        // 30 hours of counts 0..29: 24 rows are dropped by the lag filter,
        // the zone mean still covers all 30
        let df = zone_frame(3, (0..30).collect());
        let out = FeatureBuilder::try_default().unwrap().build(df).unwrap();
        assert_eq!(out.height(), 6);
        let demand = out.column(ZONE_AVG_DEMAND).unwrap().f64().unwrap();
        for value in demand.into_no_null_iter() {
            assert_relative_eq!(value, 14.5);
        }
    }

    #[test]
    fn test_without_zone_stats() {
        let out = FeatureBuilder::try_default()
            .unwrap()
            .build_without_zone_stats(constant_zone(1, 25, 2))
            .unwrap();
        assert_eq!(out.height(), 1);
        assert!(out.column(ZONE_AVG_DEMAND).is_err());
    }

    #[test]
    fn test_reindex_changes_lags() {
        // Hours 0..24 then a jump to hour 30
        let mut df = constant_zone(2, 25, 1);
        let late = constant_zone(2, 31, 9).slice(30, 1);
        df.vstack_mut(&late).unwrap();

        let config = FeatureConfig {
            lags: vec![1],
            rolling_windows: vec![],
            reindex_hourly: false,
        };
        let skipping = FeatureBuilder::new(config.clone()).unwrap().build(df.clone()).unwrap();
        let last = skipping.height() - 1;
        assert_eq!(
            skipping.column(&lag_column(1)).unwrap().i64().unwrap().get(last),
            Some(1)
        );

        let reindexed = FeatureBuilder::new(FeatureConfig {
            reindex_hourly: true,
            ..config
        })
        .unwrap()
        .build(df)
        .unwrap();
        // 31 grid hours, first dropped by lag_1h
        assert_eq!(reindexed.height(), 30);
        let last = reindexed.height() - 1;
        assert_eq!(
            reindexed.column(&lag_column(1)).unwrap().i64().unwrap().get(last),
            Some(0)
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        let builder = FeatureBuilder::try_default().unwrap();
        let empty = constant_zone(1, 0, 0);
        assert!(matches!(builder.build(empty), Err(FeatureError::EmptyInput(_))));

        let missing = constant_zone(1, 3, 1).drop(AVG_DISTANCE).unwrap();
        assert!(matches!(
            builder.build(missing),
            Err(FeatureError::MissingColumn { .. })
        ));

        let bad = FeatureConfig {
            lags: vec![],
            ..FeatureConfig::default()
        };
        assert!(FeatureBuilder::new(bad).is_err());
    }
}
