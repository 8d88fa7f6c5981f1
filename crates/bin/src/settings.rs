//! Command-line overrides on top of a configuration file.

use cabcast::PipelineConfig;
use cabcast::data::TripFilter;
use cabcast::features::ZoneStatsMode;
use cabcast::split::SplitConfig;
use cabcast_output::ExportFormat;
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct Overrides {
    /// JSON pipeline configuration
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Keep only pickups in this calendar month (YYYY-MM)
    #[arg(long, global = true)]
    pub(crate) month: Option<String>,

    /// Fraction of distinct hours used for training
    #[arg(long, global = true)]
    pub(crate) train_ratio: Option<f64>,

    /// Fraction of distinct hours used for validation
    #[arg(long, global = true)]
    pub(crate) val_ratio: Option<f64>,

    /// Where zone statistics are fitted (global or train-only)
    #[arg(long, global = true)]
    pub(crate) zone_stats: Option<String>,

    /// Fill missing zone-hours with zero demand before computing lags
    #[arg(long, global = true)]
    pub(crate) reindex_hourly: bool,

    /// Output format (parquet, csv or json)
    #[arg(long, global = true, default_value = "parquet")]
    pub(crate) format: String,
}

impl Overrides {
    /// Load the configuration file, if any, then apply flags.
    pub(crate) fn resolve(&self) -> Result<PipelineConfig, Box<dyn Error>> {
        let base = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        self.apply(base)
    }

    /// Apply flags to a configuration and validate the result.
    pub(crate) fn apply(
        &self,
        mut config: PipelineConfig,
    ) -> Result<PipelineConfig, Box<dyn Error>> {
        if self.train_ratio.is_some() || self.val_ratio.is_some() {
            config.split = SplitConfig::new(
                self.train_ratio.unwrap_or(config.split.train_ratio),
                self.val_ratio.unwrap_or(config.split.val_ratio),
            )?;
        }
        if let Some(month) = &self.month {
            let (year, month) = parse_month(month)?;
            let window = TripFilter::for_month(year, month)?;
            config.filter.window_start = window.window_start;
            config.filter.window_end = window.window_end;
        }
        if let Some(mode) = &self.zone_stats {
            config.zone_stats = mode.parse::<ZoneStatsMode>()?;
        }
        if self.reindex_hourly {
            config.features.reindex_hourly = true;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parsed output format.
    pub(crate) fn export_format(&self) -> Result<ExportFormat, Box<dyn Error>> {
        Ok(self.format.parse::<ExportFormat>()?)
    }
}

fn parse_month(value: &str) -> Result<(i32, u32), Box<dyn Error>> {
    let parsed = value
        .split_once('-')
        .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)));
    parsed.ok_or_else(|| format!("expected YYYY-MM, got '{value}'").into())
}
