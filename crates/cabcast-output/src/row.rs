//! Typed rows of the final feature table.

use crate::error::{ExportError, Result};
use cabcast_features::columns::{
    AVG_DISTANCE, AVG_FARE, DAY_OF_MONTH, DAY_OF_WEEK, HOUR_OF_DAY, IS_WEEKEND, PICKUP_COUNT,
    PICKUP_HOUR, ZONE_AVG_DEMAND, ZONE_AVG_DISTANCE, ZONE_AVG_FARE, ZONE_ID,
};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One zone-hour with every feature defined.
///
/// Fields match the default feature set: lags 1, 2 and 24, rolling windows 3
/// and 24.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Pickup zone.
    pub zone_id: i32,
    /// Start of the pickup hour.
    pub pickup_hour: NaiveDateTime,
    /// Trips in the zone-hour.
    pub pickup_count: i64,
    /// Mean fare.
    pub avg_fare: f64,
    /// Mean distance.
    pub avg_distance: f64,
    /// Hour of day, 0-23.
    pub hour_of_day: i32,
    /// Day of week, Monday = 0.
    pub day_of_week: i32,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Day of month, 1-31.
    pub day_of_month: i32,
    /// Count one sample back.
    pub lag_1h: i64,
    /// Count two samples back.
    pub lag_2h: i64,
    /// Count 24 samples back.
    pub lag_24h: i64,
    /// Mean of the 3 preceding counts.
    pub rolling_3h_mean: f64,
    /// Mean of the 24 preceding counts.
    pub rolling_24h_mean: f64,
    /// Zone mean fare.
    pub zone_avg_fare: f64,
    /// Zone mean distance.
    pub zone_avg_distance: f64,
    /// Zone mean demand.
    pub zone_avg_demand: f64,
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| ExportError::MissingColumn(name.to_string()))
}

fn defined<T>(values: Vec<Option<T>>, name: &str) -> Result<Vec<T>> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| ExportError::UndefinedValue {
                column: name.to_string(),
                row,
            })
        })
        .collect()
}

fn ints(df: &DataFrame, name: &str) -> Result<Vec<i32>> {
    let values = column(df, name)?.cast(&DataType::Int32)?;
    defined(values.i32()?.into_iter().collect(), name)
}

fn longs(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let values = column(df, name)?.cast(&DataType::Int64)?;
    defined(values.i64()?.into_iter().collect(), name)
}

fn floats(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = column(df, name)?.cast(&DataType::Float64)?;
    defined(values.f64()?.into_iter().collect(), name)
}

fn flags(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let values = column(df, name)?.cast(&DataType::Boolean)?;
    defined(values.bool()?.into_iter().collect(), name)
}

fn hours(df: &DataFrame) -> Result<Vec<NaiveDateTime>> {
    let micros = column(df, PICKUP_HOUR)?
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        .cast(&DataType::Int64)?;
    let values = micros
        .i64()?
        .into_iter()
        .map(|m| m.and_then(DateTime::from_timestamp_micros).map(|t| t.naive_utc()))
        .collect();
    defined(values, PICKUP_HOUR)
}

impl FeatureRow {
    /// Read every row of a feature frame.
    ///
    /// Fails on the first missing column or undefined cell.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<Self>> {
        let zone_id = ints(df, ZONE_ID)?;
        let pickup_hour = hours(df)?;
        let pickup_count = longs(df, PICKUP_COUNT)?;
        let avg_fare = floats(df, AVG_FARE)?;
        let avg_distance = floats(df, AVG_DISTANCE)?;
        let hour_of_day = ints(df, HOUR_OF_DAY)?;
        let day_of_week = ints(df, DAY_OF_WEEK)?;
        let is_weekend = flags(df, IS_WEEKEND)?;
        let day_of_month = ints(df, DAY_OF_MONTH)?;
        let lag_1h = longs(df, "lag_1h")?;
        let lag_2h = longs(df, "lag_2h")?;
        let lag_24h = longs(df, "lag_24h")?;
        let rolling_3h_mean = floats(df, "rolling_3h_mean")?;
        let rolling_24h_mean = floats(df, "rolling_24h_mean")?;
        let zone_avg_fare = floats(df, ZONE_AVG_FARE)?;
        let zone_avg_distance = floats(df, ZONE_AVG_DISTANCE)?;
        let zone_avg_demand = floats(df, ZONE_AVG_DEMAND)?;

        let rows = (0..df.height())
            .map(|i| Self {
                zone_id: zone_id[i],
                pickup_hour: pickup_hour[i],
                pickup_count: pickup_count[i],
                avg_fare: avg_fare[i],
                avg_distance: avg_distance[i],
                hour_of_day: hour_of_day[i],
                day_of_week: day_of_week[i],
                is_weekend: is_weekend[i],
                day_of_month: day_of_month[i],
                lag_1h: lag_1h[i],
                lag_2h: lag_2h[i],
                lag_24h: lag_24h[i],
                rolling_3h_mean: rolling_3h_mean[i],
                rolling_24h_mean: rolling_24h_mean[i],
                zone_avg_fare: zone_avg_fare[i],
                zone_avg_distance: zone_avg_distance[i],
                zone_avg_demand: zone_avg_demand[i],
            })
            .collect();
        Ok(rows)
    }
}
