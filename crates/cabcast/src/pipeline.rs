//! End-to-end pipeline.
//!
//! trips → clean → aggregate → features → split, with zone statistics either
//! fitted on the whole snapshot before the split or on the training split
//! after it.

use crate::config::PipelineConfig;
use crate::error::Result;
use cabcast_data::{TripRecord, load_trips};
use cabcast_features::{
    FeatureBuilder, TemporalAggregator, ZoneStatsMode, ZoneSummary, aggregate_trips,
};
use cabcast_split::{Segment, SplitFrames, TemporalSplitter};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// Configured pipeline, validated on construction.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    builder: FeatureBuilder,
    splitter: TemporalSplitter,
}

impl Pipeline {
    /// Create a pipeline from a configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let builder = FeatureBuilder::new(config.features.clone())?;
        let splitter = TemporalSplitter::new(config.split)?;
        Ok(Self {
            config,
            builder,
            splitter,
        })
    }

    /// Pipeline with default settings.
    pub fn try_default() -> Result<Self> {
        Self::new(PipelineConfig::default())
    }

    /// Active configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Drop trips outside the cleaning bounds.
    pub fn clean(&self, trips: DataFrame) -> Result<DataFrame> {
        Ok(self.config.filter.apply_frame(trips)?)
    }

    /// Clean trips and aggregate them into zone-hours.
    pub fn aggregate(&self, trips: DataFrame) -> Result<DataFrame> {
        let cleaned = self.clean(trips)?;
        Ok(TemporalAggregator::new().aggregate(cleaned)?)
    }

    /// Clean typed trip records and aggregate them into zone-hours.
    pub fn aggregate_records(&self, trips: Vec<TripRecord>) -> Result<DataFrame> {
        self.config.filter.validate()?;
        let cleaned = self.config.filter.apply_records(trips);
        Ok(aggregate_trips(&cleaned)?)
    }

    /// Build the feature table from zone-hours.
    ///
    /// With [`ZoneStatsMode::TrainOnly`] the zone summary columns are left
    /// out here and added by [`Pipeline::split`].
    pub fn build_features(&self, hourly: DataFrame) -> Result<DataFrame> {
        let features = match self.config.zone_stats {
            ZoneStatsMode::Global => self.builder.build(hourly)?,
            ZoneStatsMode::TrainOnly => self.builder.build_without_zone_stats(hourly)?,
        };
        Ok(features)
    }

    /// Split a feature table, fitting zone statistics on train if configured.
    pub fn split(&self, features: &DataFrame) -> Result<SplitFrames> {
        let mut splits = self.splitter.split(features)?;
        if self.config.zone_stats == ZoneStatsMode::TrainOnly {
            let summary = ZoneSummary::fit(&splits.train)?;
            for segment in Segment::ALL {
                let frame = splits.get_mut(segment);
                *frame = summary.annotate(frame.clone().lazy())?.collect()?;
            }
            info!(
                zones = summary.zone_count(),
                fallback = ?summary.fallback(),
                "annotated splits with train-only zone statistics"
            );
        }
        Ok(splits)
    }

    /// Run every stage on a raw trip frame.
    pub fn run(&self, trips: DataFrame) -> Result<SplitFrames> {
        let trip_count = trips.height();
        let hourly = self.aggregate(trips)?;
        let features = self.build_features(hourly)?;
        let splits = self.split(&features)?;
        info!(
            trips = trip_count,
            features = features.height(),
            zone_stats = %self.config.zone_stats,
            "pipeline finished"
        );
        Ok(splits)
    }

    /// Load trips from a Parquet or CSV file and run every stage.
    pub fn run_path(&self, path: &Path) -> Result<SplitFrames> {
        let trips = load_trips(path)?;
        self.run(trips)
    }
}
