#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabcast/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod builder;
pub mod calendar;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod lag;
pub mod registry;
pub mod rolling;
pub mod stage;
pub mod zone_stats;

pub use aggregate::{TemporalAggregator, aggregate_trips};
pub use builder::FeatureBuilder;
pub use calendar::CalendarFeatures;
pub use config::FeatureConfig;
pub use error::{FeatureError, Result};
pub use filter::RowFilter;
pub use grid::HourlyGrid;
pub use lag::LagFeatures;
pub use rolling::RollingFeatures;
pub use stage::FeatureStage;
pub use zone_stats::{ZoneStatistics, ZoneStatsMode, ZoneSummary};

// Re-export registry types for convenience
pub use registry::{FeatureCategory, FeatureInfo, feature_columns, features_by_category};
