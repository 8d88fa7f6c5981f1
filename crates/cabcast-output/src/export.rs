//! Writing feature tables and splits to disk.
//!
//! Parquet keeps the frame's own schema. CSV and JSON go through
//! [`FeatureRow`], so every cell is checked before anything is written.

use crate::error::{ExportError, Result};
use crate::row::FeatureRow;
use cabcast_split::{Segment, SplitFrames};
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Apache Parquet.
    #[default]
    Parquet,

    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "parquet" => Ok(Self::Parquet),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in text formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the format is binary.
    fn export_to_string(&self, format: ExportFormat) -> Result<String>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize records as CSV with a header row.
pub(crate) fn csv_string<T: Serialize>(records: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for Vec<FeatureRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => csv_string(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Parquet => Err(ExportError::InvalidFormat(
                "parquet is binary; use write_frame".to_string(),
            )),
        }
    }
}

/// Write one frame to `path`.
pub fn write_frame(df: &DataFrame, path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Parquet => {
            let file = File::create(path)?;
            let mut frame = df.clone();
            ParquetWriter::new(file).finish(&mut frame)?;
        }
        ExportFormat::Csv | ExportFormat::Json | ExportFormat::PrettyJson => {
            FeatureRow::from_frame(df)?.export_to_file(path, format)?;
        }
    }
    debug!(path = %path.display(), rows = df.height(), "wrote frame");
    Ok(())
}

/// File path of one segment inside `dir`, e.g. `dir/val.parquet`.
pub fn split_path(dir: &Path, segment: Segment, format: ExportFormat) -> PathBuf {
    dir.join(format!("{}.{}", segment.name(), format.extension()))
}

/// Write train, validation and test into `dir`, creating it if needed.
///
/// Returns the written paths in chronological segment order.
pub fn write_splits(
    dir: &Path,
    splits: &SplitFrames,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(3);
    for (segment, frame) in splits.iter() {
        let path = split_path(dir, segment, format);
        write_frame(frame, &path, format)?;
        paths.push(path);
    }
    info!(
        dir = %dir.display(),
        format = format.extension(),
        rows = splits.total_rows(),
        "wrote splits"
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::tests::feature_frame;
    use rstest::rstest;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cabcast_export_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[rstest]
    #[case("parquet", ExportFormat::Parquet, "parquet")]
    #[case("CSV", ExportFormat::Csv, "csv")]
    #[case("json", ExportFormat::Json, "json")]
    #[case("pretty-json", ExportFormat::PrettyJson, "json")]
    fn test_format_parsing(
        #[case] name: &str,
        #[case] expected: ExportFormat,
        #[case] extension: &str,
    ) {
        let format: ExportFormat = name.parse().unwrap();
        assert_eq!(format, expected);
        assert_eq!(format.extension(), extension);
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_feature_rows_csv() {
        let rows = FeatureRow::from_frame(&feature_frame(vec![Some(3)])).unwrap();
        let csv = rows.export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("zone_id,pickup_hour,pickup_count"));
        assert!(header.ends_with("zone_avg_demand"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("7,2024-01-06T10:00:00,5,"));
    }

    #[test]
    fn test_feature_rows_json() {
        let rows = FeatureRow::from_frame(&feature_frame(vec![Some(3), Some(4)])).unwrap();
        let json = rows.export_to_string(ExportFormat::Json).unwrap();
        let parsed: Vec<FeatureRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rows);

        let pretty = rows.export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains("  \"lag_24h\": 4"));
    }

    #[test]
    fn test_parquet_not_a_string() {
        let rows: Vec<FeatureRow> = Vec::new();
        assert!(rows.export_to_string(ExportFormat::Parquet).is_err());
    }

    #[test]
    fn test_write_frame_parquet() {
        let dir = temp_dir("parquet");
        let path = dir.join("features.parquet");
        let df = feature_frame(vec![Some(1), Some(2), Some(3)]);
        write_frame(&df, &path, ExportFormat::Parquet).unwrap();

        let back = ParquetReader::new(File::open(&path).unwrap()).finish().unwrap();
        assert!(back.equals(&df));
    }

    #[test]
    fn test_write_frame_rejects_undefined_cells() {
        let dir = temp_dir("undefined");
        let path = dir.join("features.csv");
        let df = feature_frame(vec![None]);
        assert!(matches!(
            write_frame(&df, &path, ExportFormat::Csv),
            Err(ExportError::UndefinedValue { .. })
        ));
    }

    #[test]
    fn test_split_path() {
        let path = split_path(Path::new("out"), Segment::Validation, ExportFormat::Csv);
        assert_eq!(path, Path::new("out").join("val.csv"));
    }
}
