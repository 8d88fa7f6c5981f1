//! Pipeline configuration.
//!
//! Every stage reads its settings from here; there are no process-wide
//! defaults beyond `Default` impls.

use crate::error::Result;
use cabcast_data::TripFilter;
use cabcast_features::{FeatureConfig, ZoneStatsMode};
use cabcast_split::SplitConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Trip cleaning bounds
    pub filter: TripFilter,
    /// Lags, rolling windows and optional reindexing
    pub features: FeatureConfig,
    /// Train and validation ratios
    pub split: SplitConfig,
    /// Where zone summary statistics are fitted
    pub zone_stats: ZoneStatsMode,
}

impl PipelineConfig {
    /// Read and validate a JSON configuration file.
    ///
    /// Missing sections and fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded pipeline config");
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.features.validate()?;
        self.split.validate()?;
        Ok(())
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use approx::assert_relative_eq;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("cabcast_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_validate() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.zone_stats, ZoneStatsMode::Global);
        assert_eq!(config.features.lags, vec![1, 2, 24]);
    }

    #[test]
    fn test_partial_file() {
        let path = write_temp(
            "partial.json",
            r#"{"split": {"train_ratio": 0.8, "val_ratio": 0.1}, "zone_stats": "train-only"}"#,
        );
        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_relative_eq!(config.split.train_ratio, 0.8);
        assert_eq!(config.zone_stats, ZoneStatsMode::TrainOnly);
        assert_eq!(config.features, FeatureConfig::default());
    }

    #[test]
    fn test_invalid_ratios_rejected() {
        let path = write_temp(
            "bad_ratio.json",
            r#"{"split": {"train_ratio": 0.9, "val_ratio": 0.2}}"#,
        );
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(PipelineError::Split(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let path = write_temp("malformed.json", "{ not json");
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig {
            zone_stats: ZoneStatsMode::TrainOnly,
            ..PipelineConfig::default()
        };
        let back: PipelineConfig = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
