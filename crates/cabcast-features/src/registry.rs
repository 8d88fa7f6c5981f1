//! Feature Registry
//!
//! Column catalogue of the final feature table. The order returned here is
//! the column order of every frame the builder produces.

use crate::columns::{
    AVG_DISTANCE, AVG_FARE, DAY_OF_MONTH, DAY_OF_WEEK, HOUR_OF_DAY, IS_WEEKEND, PICKUP_COUNT,
    PICKUP_HOUR, ZONE_AVG_DEMAND, ZONE_AVG_DISTANCE, ZONE_AVG_FARE, ZONE_ID,
};
use crate::config::FeatureConfig;

/// Feature column categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCategory {
    /// Zone-hour keys, target and per-hour means
    Base,
    /// Pure functions of the pickup hour
    Calendar,
    /// Past target values
    Lag,
    /// Trailing means of the target
    Rolling,
    /// Per-zone means broadcast onto every row
    ZoneSummary,
}

impl FeatureCategory {
    /// Every category, in output column order.
    pub const ALL: [Self; 5] = [
        Self::Base,
        Self::Calendar,
        Self::Lag,
        Self::Rolling,
        Self::ZoneSummary,
    ];

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Calendar => "Calendar",
            Self::Lag => "Lag",
            Self::Rolling => "Rolling",
            Self::ZoneSummary => "Zone summary",
        }
    }
}

/// Feature column metadata
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Column name
    pub name: String,
    /// Feature category
    pub category: FeatureCategory,
    /// What the column holds
    pub description: String,
}

impl FeatureInfo {
    fn new(name: impl Into<String>, category: FeatureCategory, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
        }
    }
}

/// All columns of the final feature table for `config`, in output order.
pub fn available_features(config: &FeatureConfig) -> Vec<FeatureInfo> {
    use FeatureCategory::*;

    let mut features = vec![
        FeatureInfo::new(ZONE_ID, Base, "Pickup zone, 1-263"),
        FeatureInfo::new(PICKUP_HOUR, Base, "Start of the pickup hour"),
        FeatureInfo::new(PICKUP_COUNT, Base, "Trips in the zone-hour (target)"),
        FeatureInfo::new(AVG_FARE, Base, "Mean fare of the zone-hour"),
        FeatureInfo::new(AVG_DISTANCE, Base, "Mean trip distance of the zone-hour"),
        FeatureInfo::new(HOUR_OF_DAY, Calendar, "Hour of day, 0-23"),
        FeatureInfo::new(DAY_OF_WEEK, Calendar, "Day of week, Monday = 0"),
        FeatureInfo::new(IS_WEEKEND, Calendar, "Saturday or Sunday"),
        FeatureInfo::new(DAY_OF_MONTH, Calendar, "Day of month, 1-31"),
    ];

    features.extend(config.lags.iter().zip(config.lag_columns()).map(|(k, name)| {
        FeatureInfo::new(name, Lag, format!("Pickup count {k} samples earlier in the zone"))
    }));
    features.extend(
        config
            .rolling_windows
            .iter()
            .zip(config.rolling_columns())
            .map(|(w, name)| {
                FeatureInfo::new(
                    name,
                    Rolling,
                    format!("Mean pickup count over the {w} preceding samples"),
                )
            }),
    );

    features.extend([
        FeatureInfo::new(ZONE_AVG_FARE, ZoneSummary, "Zone mean of avg_fare"),
        FeatureInfo::new(ZONE_AVG_DISTANCE, ZoneSummary, "Zone mean of avg_distance"),
        FeatureInfo::new(ZONE_AVG_DEMAND, ZoneSummary, "Zone mean of pickup_count"),
    ]);
    features
}

/// Column names of the final feature table, in output order.
pub fn feature_columns(config: &FeatureConfig) -> Vec<String> {
    available_features(config)
        .into_iter()
        .map(|f| f.name)
        .collect()
}

/// Features of one category, in output order.
pub fn features_by_category(config: &FeatureConfig, category: FeatureCategory) -> Vec<FeatureInfo> {
    available_features(config)
        .into_iter()
        .filter(|f| f.category == category)
        .collect()
}
