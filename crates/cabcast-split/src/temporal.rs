//! Temporal Splitter
//!
//! Cuts the sorted list of distinct hours at
//! `floor(N * train_ratio)` and `floor(N * (train_ratio + val_ratio))`.
//! The hour at each cut index opens the next segment, so every hour belongs
//! to exactly one segment. A cut index at or past `N` means that segment and
//! all later ones are empty.

use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use cabcast_features::columns::PICKUP_HOUR;
use polars::prelude::*;
use std::fmt;
use tracing::{info, warn};

/// One of the three chronological segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Earliest hours
    Train,
    /// Middle hours
    Validation,
    /// Latest hours
    Test,
}

impl Segment {
    /// All segments in chronological order.
    pub const ALL: [Self; 3] = [Self::Train, Self::Validation, Self::Test];

    /// Short name, also used as the output file stem.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "val",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the segments start, in microseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitBoundaries {
    /// Number of distinct hours in the table
    pub distinct_hours: usize,
    /// Index of the first validation hour in the sorted distinct hours
    pub train_end_index: usize,
    /// Index of the first test hour in the sorted distinct hours
    pub val_end_index: usize,
    /// First validation hour; `None` when validation and test are empty
    pub train_end: Option<i64>,
    /// First test hour; `None` when test is empty
    pub val_end: Option<i64>,
}

impl SplitBoundaries {
    /// Compute cut points over ascending, deduplicated hours.
    pub fn from_sorted_hours(hours: &[i64], config: &SplitConfig) -> Result<Self> {
        config.validate()?;
        let n = hours.len();
        if n == 0 {
            return Err(SplitError::EmptyInput(
                "feature table has no hours to split".to_string(),
            ));
        }

        let train_end_index = cut_index(n, config.train_ratio);
        let val_end_index =
            cut_index(n, config.train_ratio + config.val_ratio).max(train_end_index);

        Ok(Self {
            distinct_hours: n,
            train_end_index,
            val_end_index,
            train_end: hours.get(train_end_index).copied(),
            val_end: hours.get(val_end_index).copied(),
        })
    }

    /// Row predicate selecting one segment.
    pub fn predicate(&self, segment: Segment) -> Expr {
        let hour = || col(PICKUP_HOUR).cast(DataType::Int64);
        let before = |bound: Option<i64>| bound.map_or_else(|| lit(true), |b| hour().lt(lit(b)));
        let from = |bound: Option<i64>| bound.map_or_else(|| lit(false), |b| hour().gt_eq(lit(b)));

        match segment {
            Segment::Train => before(self.train_end),
            Segment::Validation => from(self.train_end).and(before(self.val_end)),
            Segment::Test => from(self.val_end),
        }
    }
}

fn cut_index(n: usize, ratio: f64) -> usize {
    let raw = (n as f64 * ratio).floor();
    if raw <= 0.0 { 0 } else { (raw as usize).min(n) }
}

/// The three segments of a split feature table.
#[derive(Debug, Clone)]
pub struct SplitFrames {
    /// Training rows
    pub train: DataFrame,
    /// Validation rows
    pub validation: DataFrame,
    /// Test rows
    pub test: DataFrame,
    /// Cut points used
    pub boundaries: SplitBoundaries,
}

impl SplitFrames {
    /// Frame of one segment.
    pub const fn get(&self, segment: Segment) -> &DataFrame {
        match segment {
            Segment::Train => &self.train,
            Segment::Validation => &self.validation,
            Segment::Test => &self.test,
        }
    }

    /// Mutable frame of one segment.
    pub fn get_mut(&mut self, segment: Segment) -> &mut DataFrame {
        match segment {
            Segment::Train => &mut self.train,
            Segment::Validation => &mut self.validation,
            Segment::Test => &mut self.test,
        }
    }

    /// Segments with their frames, in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Segment, &DataFrame)> {
        Segment::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Rows across all three segments.
    pub fn total_rows(&self) -> usize {
        self.train.height() + self.validation.height() + self.test.height()
    }
}

/// Chronological train/validation/test splitter.
#[derive(Debug, Clone, Copy)]
pub struct TemporalSplitter {
    config: SplitConfig,
}

impl TemporalSplitter {
    /// Create a splitter, validating the ratios.
    pub fn new(config: SplitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Splitter with the default 0.70 / 0.15 / 0.15 ratios.
    pub fn try_default() -> Result<Self> {
        Self::new(SplitConfig::default())
    }

    /// Active configuration.
    pub const fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Cut points for `features` without splitting it.
    pub fn boundaries(&self, features: &DataFrame) -> Result<SplitBoundaries> {
        let hours = distinct_hours(features)?;
        SplitBoundaries::from_sorted_hours(&hours, &self.config)
    }

    /// Split `features` into train, validation and test.
    ///
    /// Row order within each segment is preserved from the input.
    pub fn split(&self, features: &DataFrame) -> Result<SplitFrames> {
        let boundaries = self.boundaries(features)?;

        let segment = |s: Segment| -> Result<DataFrame> {
            Ok(features
                .clone()
                .lazy()
                .filter(boundaries.predicate(s))
                .collect()?)
        };
        let frames = SplitFrames {
            train: segment(Segment::Train)?,
            validation: segment(Segment::Validation)?,
            test: segment(Segment::Test)?,
            boundaries,
        };

        info!(
            hours = boundaries.distinct_hours,
            train_end_index = boundaries.train_end_index,
            val_end_index = boundaries.val_end_index,
            train = frames.train.height(),
            val = frames.validation.height(),
            test = frames.test.height(),
            "split feature table"
        );
        for (segment, frame) in frames.iter() {
            if frame.height() == 0 {
                warn!(%segment, "split segment is empty");
            }
        }
        Ok(frames)
    }
}

/// Distinct non-null hours of `features` in microseconds, ascending.
fn distinct_hours(features: &DataFrame) -> Result<Vec<i64>> {
    let column = features
        .column(PICKUP_HOUR)
        .map_err(|_| SplitError::MissingColumn(PICKUP_HOUR.to_string()))?;
    let micros = column.cast(&DataType::Int64)?;
    let mut hours: Vec<i64> = micros.i64()?.into_iter().flatten().collect();
    hours.sort_unstable();
    hours.dedup();
    Ok(hours)
}
