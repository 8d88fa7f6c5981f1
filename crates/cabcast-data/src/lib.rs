#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clean;
pub mod columns;
pub mod error;
pub mod load;
pub mod trip;
pub mod zone;

pub use clean::TripFilter;
pub use error::{DataError, Result};
pub use load::{load_trips, load_trips_csv, load_trips_parquet, normalize_trip_frame, read_parquet};
pub use trip::{TripRecord, trips_to_frame};
pub use zone::{TAXI_ZONE_COUNT, ZoneId};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
