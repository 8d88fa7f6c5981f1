//! Optional reindex onto a continuous hourly grid.
//!
//! By default a zone's hours without trips are simply missing, so lags count
//! samples rather than wall-clock hours. Reindexing inserts every missing hour
//! between a zone's first and last observed hour as a zero-demand sample,
//! after which `lag_{k}h` really is `k` hours back.

use crate::aggregate::MICROS_PER_HOUR;
use crate::columns::{AVG_DISTANCE, AVG_FARE, HOURLY_COLUMNS, PICKUP_COUNT, PICKUP_HOUR, ZONE_ID};
use crate::error::Result;
use crate::stage::require_columns;
use polars::prelude::*;
use tracing::info;

/// Fills each zone's gap hours with zero-demand samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct HourlyGrid;

impl HourlyGrid {
    /// Create a new grid reindexer.
    pub const fn new() -> Self {
        Self
    }

    /// Reindex a zone-hour table.
    ///
    /// Inserted rows get `pickup_count = 0`, `avg_fare = 0.0` and
    /// `avg_distance = 0.0`. Hours before a zone's first sample or after its
    /// last are not added. Output is sorted by `(zone_id, pickup_hour)`.
    pub fn reindex(&self, hourly: &DataFrame) -> Result<DataFrame> {
        require_columns(hourly, &HOURLY_COLUMNS, "hourly grid")?;

        let micros = || col(PICKUP_HOUR).cast(DataType::Int64);
        let spans = hourly
            .clone()
            .lazy()
            .group_by_stable([col(ZONE_ID)])
            .agg([micros().min().alias("first"), micros().max().alias("last")])
            .sort([ZONE_ID], Default::default())
            .collect()?;

        let zones = spans.column(ZONE_ID)?.i32()?;
        let firsts = spans.column("first")?.i64()?;
        let lasts = spans.column("last")?.i64()?;

        let mut grid_zones: Vec<i32> = Vec::new();
        let mut grid_hours: Vec<i64> = Vec::new();
        for ((zone, first), last) in zones.into_iter().zip(firsts).zip(lasts) {
            let (Some(zone), Some(first), Some(last)) = (zone, first, last) else {
                continue;
            };
            let mut hour = first;
            while hour <= last {
                grid_zones.push(zone);
                grid_hours.push(hour);
                hour += MICROS_PER_HOUR;
            }
        }

        let grid = DataFrame::new(vec![
            Series::new(ZONE_ID.into(), grid_zones).into(),
            Series::new(PICKUP_HOUR.into(), grid_hours)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
                .into(),
        ])?;

        let filled = grid
            .lazy()
            .join(
                hourly
                    .clone()
                    .lazy()
                    .select(HOURLY_COLUMNS.iter().map(|c| col(*c)).collect::<Vec<_>>())
                    .with_column(
                        col(PICKUP_HOUR).cast(DataType::Datetime(TimeUnit::Microseconds, None)),
                    ),
                [col(ZONE_ID), col(PICKUP_HOUR)],
                [col(ZONE_ID), col(PICKUP_HOUR)],
                JoinArgs::new(JoinType::Left),
            )
            .with_columns([
                col(PICKUP_COUNT).fill_null(lit(0i64)),
                col(AVG_FARE).fill_null(lit(0.0)),
                col(AVG_DISTANCE).fill_null(lit(0.0)),
            ])
            .sort([ZONE_ID, PICKUP_HOUR], Default::default())
            .collect()?;

        info!(
            samples = hourly.height(),
            grid = filled.height(),
            inserted = filled.height().saturating_sub(hourly.height()),
            "reindexed zone-hours onto hourly grid"
        );
        Ok(filled)
    }
}
