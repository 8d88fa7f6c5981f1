//! Split summary reporting.
//!
//! Describes each segment of a split by size, hour coverage and zone
//! coverage, and renders the result as an ASCII table or JSON.

use crate::error::{ExportError, Result};
use crate::export::{ExportFormat, Exporter, csv_string};
use cabcast_features::columns::{PICKUP_HOUR, ZONE_ID};
use cabcast_split::{Segment, SplitFrames};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Size and coverage of one segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentSummary {
    /// Segment name (`train`, `val` or `test`).
    pub segment: String,

    /// Number of rows.
    pub rows: usize,

    /// Number of distinct pickup hours.
    pub hours: usize,

    /// Number of distinct zones.
    pub zones: usize,

    /// Earliest pickup hour, if any rows.
    pub first_hour: Option<NaiveDateTime>,

    /// Latest pickup hour, if any rows.
    pub last_hour: Option<NaiveDateTime>,
}

impl SegmentSummary {
    /// Summarize one segment frame.
    pub fn from_frame(segment: Segment, df: &DataFrame) -> Result<Self> {
        let hours = df
            .column(PICKUP_HOUR)
            .map_err(|_| ExportError::MissingColumn(PICKUP_HOUR.to_string()))?
            .cast(&DataType::Int64)?;
        let zones = df
            .column(ZONE_ID)
            .map_err(|_| ExportError::MissingColumn(ZONE_ID.to_string()))?
            .cast(&DataType::Int32)?;

        let hours = hours.i64()?;
        let distinct_hours: HashSet<i64> = hours.into_iter().flatten().collect();
        let distinct_zones: HashSet<i32> = zones.i32()?.into_iter().flatten().collect();
        let to_time = |micros: Option<i64>| {
            micros
                .and_then(DateTime::from_timestamp_micros)
                .map(|t| t.naive_utc())
        };

        Ok(Self {
            segment: segment.name().to_string(),
            rows: df.height(),
            hours: distinct_hours.len(),
            zones: distinct_zones.len(),
            first_hour: to_time(hours.min()),
            last_hour: to_time(hours.max()),
        })
    }
}

/// Summary of a whole split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitSummary {
    /// Distinct hours in the table before splitting.
    pub distinct_hours: usize,

    /// Per-segment summaries, chronological.
    pub segments: Vec<SegmentSummary>,
}

impl SplitSummary {
    /// Summarize train, validation and test.
    pub fn from_splits(splits: &SplitFrames) -> Result<Self> {
        let segments = splits
            .iter()
            .map(|(segment, frame)| SegmentSummary::from_frame(segment, frame))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            distinct_hours: splits.boundaries.distinct_hours,
            segments,
        })
    }

    /// Rows across all segments.
    pub fn total_rows(&self) -> usize {
        self.segments.iter().map(|s| s.rows).sum()
    }

    /// Render as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let fmt_hour = |h: Option<NaiveDateTime>| {
            h.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string())
        };

        output.push_str(&format!(
            "\nTemporal Split ({} distinct hours, {} rows)\n",
            self.distinct_hours,
            self.total_rows()
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:<8} {:>10} {:>8} {:>8} {:>20} {:>20}\n",
            "Segment", "Rows", "Hours", "Zones", "First Hour", "Last Hour"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for s in &self.segments {
            output.push_str(&format!(
                "{:<8} {:>10} {:>8} {:>8} {:>20} {:>20}\n",
                s.segment,
                s.rows,
                s.hours,
                s.zones,
                fmt_hour(s.first_hour),
                fmt_hour(s.last_hour)
            ));
        }

        output.push_str(&"=".repeat(80));
        output.push('\n');
        output
    }

    /// Convert to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

impl Exporter for SplitSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => csv_string(&self.segments),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => self.to_json(),
            ExportFormat::Parquet => Err(ExportError::InvalidFormat(
                "summaries are text only".to_string(),
            )),
        }
    }
}
