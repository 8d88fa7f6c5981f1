//! Temporal Aggregator
//!
//! Collapses trips into one row per populated `(zone_id, pickup_hour)`.
//! Hours without trips are absent, not zero-filled.

use crate::columns::{AVG_DISTANCE, AVG_FARE, PICKUP_COUNT, PICKUP_HOUR, ZONE_ID};
use crate::error::{FeatureError, Result};
use crate::stage::{FeatureStage, run_stage};
use cabcast_data::TripRecord;
use cabcast_data::columns::{FARE_AMOUNT, PICKUP_DATETIME, TRIP_DISTANCE};
use polars::prelude::*;
use tracing::info;

/// Microseconds in one hour.
pub(crate) const MICROS_PER_HOUR: i64 = 3_600_000_000;

/// Groups trips by zone and hour-truncated pickup time.
///
/// Input is trusted: zone range, fare sign, distance and date window are the
/// cleaning step's responsibility.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemporalAggregator;

impl TemporalAggregator {
    /// Create a new aggregator.
    pub const fn new() -> Self {
        Self
    }

    /// Aggregate a materialized trip frame.
    ///
    /// Fails with [`FeatureError::EmptyInput`] when there are no trips.
    pub fn aggregate(&self, trips: DataFrame) -> Result<DataFrame> {
        if trips.height() == 0 {
            return Err(FeatureError::EmptyInput(
                "no trip records to aggregate".to_string(),
            ));
        }
        let trip_count = trips.height();
        let hourly = run_stage(self, trips.lazy())?.collect()?;
        info!(
            trips = trip_count,
            zone_hours = hourly.height(),
            "aggregated trips into zone-hours"
        );
        Ok(hourly)
    }
}

impl FeatureStage for TemporalAggregator {
    fn name(&self) -> &str {
        "temporal_aggregator"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![ZONE_ID, PICKUP_DATETIME, FARE_AMOUNT, TRIP_DISTANCE]
    }

    fn produced_columns(&self) -> Vec<String> {
        [PICKUP_HOUR, PICKUP_COUNT, AVG_FARE, AVG_DISTANCE]
            .iter()
            .map(|c| (*c).to_string())
            .collect()
    }

    fn apply(&self, data: LazyFrame) -> Result<LazyFrame> {
        let hour = col(PICKUP_DATETIME)
            .cast(DataType::Datetime(TimeUnit::Microseconds, None))
            .dt()
            .truncate(lit("1h"))
            .alias(PICKUP_HOUR);

        let result = data
            .with_column(hour)
            .group_by_stable([col(ZONE_ID), col(PICKUP_HOUR)])
            .agg([
                len().cast(DataType::Int64).alias(PICKUP_COUNT),
                col(FARE_AMOUNT).mean().alias(AVG_FARE),
                col(TRIP_DISTANCE).mean().alias(AVG_DISTANCE),
            ])
            .sort([ZONE_ID, PICKUP_HOUR], Default::default());

        Ok(result)
    }
}

/// Aggregate typed trip records.
pub fn aggregate_trips(trips: &[TripRecord]) -> Result<DataFrame> {
    if trips.is_empty() {
        return Err(FeatureError::EmptyInput(
            "no trip records to aggregate".to_string(),
        ));
    }
    let frame = cabcast_data::trips_to_frame(trips)?;
    TemporalAggregator::new().aggregate(frame)
}
