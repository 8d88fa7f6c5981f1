//! Record-level cleaning of raw trips.
//!
//! Removes trips that cannot be attributed to a zone-hour of the study window:
//! unknown pickup zones, negative fares, implausibly long trips, and pickups
//! outside the calendar window.

use crate::columns::{FARE_AMOUNT, PICKUP_DATETIME, TRIP_DISTANCE, ZONE_ID};
use crate::error::{DataError, Result};
use crate::trip::TripRecord;
use crate::zone::ZoneId;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Bounds a trip must satisfy to enter aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripFilter {
    /// Smallest accepted zone id (default: 1)
    pub min_zone: i32,
    /// Largest accepted zone id (default: 263)
    pub max_zone: i32,
    /// Minimum fare, inclusive (default: 0.0)
    pub min_fare: f64,
    /// Maximum trip distance in miles, inclusive (default: 100.0)
    pub max_distance: f64,
    /// First pickup instant kept, inclusive (default: 2024-01-01 00:00)
    pub window_start: NaiveDateTime,
    /// End of the window, exclusive (default: 2024-02-01 00:00)
    pub window_end: NaiveDateTime,
}

impl Default for TripFilter {
    fn default() -> Self {
        Self {
            min_zone: ZoneId::MIN.get(),
            max_zone: ZoneId::MAX.get(),
            min_fare: 0.0,
            max_distance: 100.0,
            window_start: month_start(2024, 1),
            window_end: month_start(2024, 2),
        }
    }
}

fn month_start(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl TripFilter {
    /// Filter for a single calendar month.
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DataError::InvalidFilter(format!("no such month {year}-{month:02}")))?;
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .ok_or_else(|| DataError::InvalidFilter(format!("month {year}-{month:02} overflows")))?;

        Ok(Self {
            window_start: start.and_time(chrono::NaiveTime::MIN),
            window_end: end.and_time(chrono::NaiveTime::MIN),
            ..Self::default()
        })
    }

    /// Check that the bounds describe a non-empty region.
    pub fn validate(&self) -> Result<()> {
        if ZoneId::new(self.min_zone).is_none() || ZoneId::new(self.max_zone).is_none() {
            return Err(DataError::InvalidFilter(format!(
                "zone bounds {}..={} outside {}..={}",
                self.min_zone,
                self.max_zone,
                ZoneId::MIN,
                ZoneId::MAX
            )));
        }
        if self.min_zone > self.max_zone {
            return Err(DataError::InvalidFilter(format!(
                "zone range {}..={} is empty",
                self.min_zone, self.max_zone
            )));
        }
        if self.window_start >= self.window_end {
            return Err(DataError::InvalidFilter(format!(
                "window start {} is not before end {}",
                self.window_start, self.window_end
            )));
        }
        if self.min_fare.is_nan() || self.max_distance.is_nan() {
            return Err(DataError::InvalidFilter(
                "fare and distance bounds must be numbers".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a single trip passes every bound.
    pub fn keeps(&self, trip: &TripRecord) -> bool {
        (self.min_zone..=self.max_zone).contains(&trip.zone_id)
            && trip.fare_amount >= self.min_fare
            && trip.trip_distance <= self.max_distance
            && trip.pickup_datetime >= self.window_start
            && trip.pickup_datetime < self.window_end
    }

    /// Filter typed records, preserving input order.
    pub fn apply_records(&self, trips: Vec<TripRecord>) -> Vec<TripRecord> {
        let initial = trips.len();
        let kept: Vec<TripRecord> = trips.into_iter().filter(|t| self.keeps(t)).collect();
        info!(
            before = initial,
            after = kept.len(),
            removed = initial - kept.len(),
            "cleaned trip records"
        );
        kept
    }

    /// Lazy predicate over the canonical trip frame.
    pub fn predicate(&self) -> Expr {
        let start = self.window_start.and_utc().timestamp_micros();
        let end = self.window_end.and_utc().timestamp_micros();
        let pickup = col(PICKUP_DATETIME).cast(DataType::Int64);

        col(ZONE_ID)
            .gt_eq(lit(self.min_zone))
            .and(col(ZONE_ID).lt_eq(lit(self.max_zone)))
            .and(col(FARE_AMOUNT).gt_eq(lit(self.min_fare)))
            .and(col(TRIP_DISTANCE).lt_eq(lit(self.max_distance)))
            .and(pickup.clone().gt_eq(lit(start)))
            .and(pickup.lt(lit(end)))
    }

    /// Filter a lazy trip frame.
    pub fn apply(&self, trips: LazyFrame) -> LazyFrame {
        trips.filter(self.predicate())
    }

    /// Filter a materialized trip frame, logging how many rows were removed.
    pub fn apply_frame(&self, trips: DataFrame) -> Result<DataFrame> {
        self.validate()?;
        let initial = trips.height();
        let cleaned = self.apply(trips.lazy()).collect()?;
        info!(
            before = initial,
            after = cleaned.height(),
            removed = initial - cleaned.height(),
            "cleaned trip frame"
        );
        Ok(cleaned)
    }
}
