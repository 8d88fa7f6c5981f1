//! Raw trip ingestion.
//!
//! Reads TLC yellow-cab exports (Parquet) or CSV files of [`TripRecord`]s and
//! produces the canonical trip frame.

use crate::columns::{
    FARE_AMOUNT, PICKUP_DATETIME, TLC_PICKUP_DATETIME, TLC_PICKUP_LOCATION, TRIP_DISTANCE,
    ZONE_ID,
};
use crate::error::{DataError, Result};
use crate::trip::{TripRecord, trips_to_frame};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Read any Parquet file into a frame.
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    debug!(path = %path.display(), rows = df.height(), "read parquet");
    Ok(df)
}

/// Load raw trips, choosing the reader from the file extension.
///
/// A file without any trips is an error.
pub fn load_trips(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let trips = match extension.as_deref() {
        Some("parquet") => load_trips_parquet(path)?,
        Some("csv") => load_trips_csv(path)?,
        _ => return Err(DataError::UnsupportedFormat(path.display().to_string())),
    };
    if trips.height() == 0 {
        return Err(DataError::EmptyInput(format!(
            "no trips in {}",
            path.display()
        )));
    }
    Ok(trips)
}

/// Load a TLC Parquet export.
pub fn load_trips_parquet(path: &Path) -> Result<DataFrame> {
    let raw = read_parquet(path)?;
    let trips = normalize_trip_frame(raw)?;
    info!(path = %path.display(), rows = trips.height(), "loaded trips");
    Ok(trips)
}

/// Load a CSV of trip records.
///
/// Headers may use canonical names or the TLC names (`PULocationID`,
/// `tpep_pickup_datetime`).
pub fn load_trips_csv(path: &Path) -> Result<DataFrame> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<TripRecord>, _>>()?;
    let trips = trips_to_frame(&records)?;
    info!(path = %path.display(), rows = trips.height(), "loaded trips");
    Ok(trips)
}

/// Rename and cast a raw trip frame onto the canonical schema.
///
/// Every canonical column may come under its canonical name or its TLC name.
/// Extra columns are dropped.
pub fn normalize_trip_frame(raw: DataFrame) -> Result<DataFrame> {
    let zone = resolve_column(&raw, ZONE_ID, Some(TLC_PICKUP_LOCATION))?;
    let pickup = resolve_column(&raw, PICKUP_DATETIME, Some(TLC_PICKUP_DATETIME))?;
    let fare = resolve_column(&raw, FARE_AMOUNT, None)?;
    let distance = resolve_column(&raw, TRIP_DISTANCE, None)?;

    let df = raw
        .lazy()
        .select([
            col(zone).cast(DataType::Int32).alias(ZONE_ID),
            col(pickup)
                .cast(DataType::Datetime(TimeUnit::Microseconds, None))
                .alias(PICKUP_DATETIME),
            col(fare).cast(DataType::Float64).alias(FARE_AMOUNT),
            col(distance).cast(DataType::Float64).alias(TRIP_DISTANCE),
        ])
        .collect()?;

    Ok(df)
}

fn resolve_column<'a>(
    df: &DataFrame,
    canonical: &'a str,
    tlc: Option<&'a str>,
) -> Result<&'a str> {
    if df.column(canonical).is_ok() {
        return Ok(canonical);
    }
    match tlc {
        Some(name) if df.column(name).is_ok() => Ok(name),
        _ => Err(DataError::MissingColumn {
            column: canonical.to_string(),
            context: "trip input".to_string(),
        }),
    }
}
