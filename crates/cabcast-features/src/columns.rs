//! Column names of the zone-hour and feature tables.

pub use cabcast_data::columns::ZONE_ID;

/// Start of the pickup hour (Datetime, microseconds).
pub const PICKUP_HOUR: &str = "pickup_hour";
/// Trips in the zone-hour; the forecasting target (Int64).
pub const PICKUP_COUNT: &str = "pickup_count";
/// Mean fare of the zone-hour's trips (Float64).
pub const AVG_FARE: &str = "avg_fare";
/// Mean distance of the zone-hour's trips (Float64).
pub const AVG_DISTANCE: &str = "avg_distance";

/// Hour of day, 0-23.
pub const HOUR_OF_DAY: &str = "hour_of_day";
/// Day of week, Monday = 0.
pub const DAY_OF_WEEK: &str = "day_of_week";
/// Saturday or Sunday.
pub const IS_WEEKEND: &str = "is_weekend";
/// Day of month, 1-31.
pub const DAY_OF_MONTH: &str = "day_of_month";

/// Zone mean of `avg_fare`.
pub const ZONE_AVG_FARE: &str = "zone_avg_fare";
/// Zone mean of `avg_distance`.
pub const ZONE_AVG_DISTANCE: &str = "zone_avg_distance";
/// Zone mean of `pickup_count`.
pub const ZONE_AVG_DEMAND: &str = "zone_avg_demand";

/// Columns every zone-hour table carries, in order.
pub const HOURLY_COLUMNS: [&str; 5] = [ZONE_ID, PICKUP_HOUR, PICKUP_COUNT, AVG_FARE, AVG_DISTANCE];

/// Calendar columns, in order.
pub const CALENDAR_COLUMNS: [&str; 4] = [HOUR_OF_DAY, DAY_OF_WEEK, IS_WEEKEND, DAY_OF_MONTH];

/// Zone summary columns, in order.
pub const ZONE_SUMMARY_COLUMNS: [&str; 3] = [ZONE_AVG_FARE, ZONE_AVG_DISTANCE, ZONE_AVG_DEMAND];

/// Name of the lag column for `k` samples back.
pub fn lag_column(k: usize) -> String {
    format!("lag_{k}h")
}

/// Name of the rolling mean column over `w` preceding samples.
pub fn rolling_mean_column(w: usize) -> String {
    format!("rolling_{w}h_mean")
}
