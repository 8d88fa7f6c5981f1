//! Canonical column names of the trip frame.
//!
//! Raw TLC exports use their own naming; [`crate::normalize_trip_frame`] maps
//! them onto these names.

/// Pickup zone id (Int32).
pub const ZONE_ID: &str = "zone_id";
/// Pickup timestamp (Datetime, microseconds).
pub const PICKUP_DATETIME: &str = "pickup_datetime";
/// Fare amount (Float64).
pub const FARE_AMOUNT: &str = "fare_amount";
/// Trip distance in miles (Float64).
pub const TRIP_DISTANCE: &str = "trip_distance";

/// Columns of the canonical trip frame, in order.
pub const TRIP_COLUMNS: [&str; 4] = [ZONE_ID, PICKUP_DATETIME, FARE_AMOUNT, TRIP_DISTANCE];

/// TLC name of the pickup zone column.
pub const TLC_PICKUP_LOCATION: &str = "PULocationID";
/// TLC name of the yellow-cab pickup timestamp column.
pub const TLC_PICKUP_DATETIME: &str = "tpep_pickup_datetime";
