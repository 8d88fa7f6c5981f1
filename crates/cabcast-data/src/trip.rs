//! Trip-level records and their frame representation.

use crate::columns::{FARE_AMOUNT, PICKUP_DATETIME, TRIP_DISTANCE, ZONE_ID};
use crate::error::Result;
use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One taxi trip, as delivered by ingestion.
///
/// The zone id is kept raw: records are validated by [`crate::TripFilter`],
/// not on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Pickup zone id
    #[serde(alias = "PULocationID")]
    pub zone_id: i32,
    /// Pickup timestamp (naive, local time of the feed)
    #[serde(alias = "tpep_pickup_datetime", with = "pickup_format")]
    pub pickup_datetime: NaiveDateTime,
    /// Fare amount in dollars
    pub fare_amount: f64,
    /// Trip distance in miles
    pub trip_distance: f64,
}

impl TripRecord {
    /// Create a new trip record.
    pub const fn new(
        zone_id: i32,
        pickup_datetime: NaiveDateTime,
        fare_amount: f64,
        trip_distance: f64,
    ) -> Self {
        Self {
            zone_id,
            pickup_datetime,
            fare_amount,
            trip_distance,
        }
    }

    /// Pickup timestamp as microseconds since the Unix epoch.
    pub fn pickup_micros(&self) -> i64 {
        self.pickup_datetime.and_utc().timestamp_micros()
    }
}

/// Build the canonical trip frame from typed records.
///
/// Columns: `zone_id` (Int32), `pickup_datetime` (Datetime us),
/// `fare_amount` (Float64), `trip_distance` (Float64).
pub fn trips_to_frame(trips: &[TripRecord]) -> Result<DataFrame> {
    let zones: Vec<i32> = trips.iter().map(|t| t.zone_id).collect();
    let pickups: Vec<i64> = trips.iter().map(TripRecord::pickup_micros).collect();
    let fares: Vec<f64> = trips.iter().map(|t| t.fare_amount).collect();
    let distances: Vec<f64> = trips.iter().map(|t| t.trip_distance).collect();

    let pickups = Series::new(PICKUP_DATETIME.into(), pickups)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    let df = DataFrame::new(vec![
        Series::new(ZONE_ID.into(), zones).into(),
        pickups.into(),
        Series::new(FARE_AMOUNT.into(), fares).into(),
        Series::new(TRIP_DISTANCE.into(), distances).into(),
    ])?;

    Ok(df)
}

/// Pickup timestamps in CSV exports come either ISO-8601 (`T` separator) or
/// space separated, optionally with fractional seconds.
mod pickup_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    pub(super) fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| D::Error::custom(format!("unrecognised pickup timestamp '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_trips_to_frame_schema() {
        let trips = vec![
            TripRecord::new(7, at(1, 8, 15), 12.5, 2.1),
            TripRecord::new(132, at(1, 9, 40), 52.0, 17.3),
        ];

        let df = trips_to_frame(&trips).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec![ZONE_ID, PICKUP_DATETIME, FARE_AMOUNT, TRIP_DISTANCE]);
        assert_eq!(
            df.column(PICKUP_DATETIME).unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
        assert_eq!(df.column(ZONE_ID).unwrap().dtype(), &DataType::Int32);
    }

    #[test]
    fn test_empty_trips_give_empty_frame() {
        let df = trips_to_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_pickup_micros() {
        let trip = TripRecord::new(1, at(1, 0, 0), 0.0, 0.0);
        assert_eq!(trip.pickup_micros(), 1_704_067_200_000_000);
    }

    #[test]
    fn test_csv_deserialize_tlc_headers() {
        let data = "PULocationID,tpep_pickup_datetime,fare_amount,trip_distance\n\
                    161,2024-01-03 17:22:09,14.2,1.9\n\
                    236,2024-01-03T18:01:00,8.6,0.7\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let trips: Vec<TripRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].zone_id, 161);
        assert_eq!(
            trips[0].pickup_datetime,
            NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(17, 22, 9)
                .unwrap()
        );
        assert_eq!(trips[1].pickup_datetime, at(3, 18, 1));
    }

    #[test]
    fn test_csv_rejects_bad_timestamp() {
        let data = "zone_id,pickup_datetime,fare_amount,trip_distance\n1,yesterday,1.0,1.0\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let parsed: std::result::Result<Vec<TripRecord>, _> = reader.deserialize().collect();
        assert!(parsed.is_err());
    }
}
