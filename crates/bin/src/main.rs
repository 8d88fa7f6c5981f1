//! cabcast CLI binary.
//!
//! Turns raw taxi trips into zone-hour demand features and writes
//! chronological train, validation and test splits.

mod settings;

use cabcast::{Pipeline, SplitFrames};
use cabcast_data::{load_trips, read_parquet};
use cabcast_features::{FeatureBuilder, FeatureCategory, features_by_category};
use cabcast_output::{ExportFormat, SplitSummary, write_frame, write_splits};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use settings::Overrides;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cabcast")]
#[command(about = "cabcast: zone-hour taxi demand features", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: Overrides,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, clean and aggregate trips into zone-hours
    Aggregate {
        /// Trip file (.parquet or .csv)
        #[arg(long)]
        input: PathBuf,

        /// Zone-hour Parquet file
        #[arg(long, default_value = "data/hourly.parquet")]
        output: PathBuf,
    },

    /// Build the feature table from zone-hours
    Features {
        /// Zone-hour Parquet file
        #[arg(long)]
        input: PathBuf,

        /// Feature table file
        #[arg(long, default_value = "data/features.parquet")]
        output: PathBuf,
    },

    /// Split a feature table by time
    Split {
        /// Feature table Parquet file
        #[arg(long)]
        input: PathBuf,

        /// Directory for train, val and test files
        #[arg(long, default_value = "data/splits")]
        output_dir: PathBuf,
    },

    /// List the columns of the feature table
    ListFeatures,

    /// Run every stage from trips to splits
    Run {
        /// Trip file (.parquet or .csv)
        #[arg(long)]
        input: PathBuf,

        /// Directory for train, val and test files
        #[arg(long, default_value = "data/splits")]
        output_dir: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.options.resolve()?;
    let format = cli.options.export_format()?;
    debug!(?config, format = format.extension(), "resolved configuration");
    let pipeline = Pipeline::new(config)?;

    match cli.command {
        Commands::Aggregate { input, output } => aggregate(&pipeline, &input, &output)?,
        Commands::Features { input, output } => features(&pipeline, &input, &output, format)?,
        Commands::Split { input, output_dir } => split(&pipeline, &input, &output_dir, format)?,
        Commands::ListFeatures => list_features(&pipeline),
        Commands::Run { input, output_dir } => {
            let pb = spinner("Running pipeline...")?;
            let splits = pipeline.run_path(&input)?;
            pb.finish_with_message("Pipeline finished");
            finish_splits(&splits, &output_dir, format)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

fn ensure_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Zone-hours are always written as Parquet.
fn aggregate(pipeline: &Pipeline, input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let pb = spinner("Loading trips...")?;
    let trips = load_trips(input)?;
    let trip_count = trips.height();
    pb.set_message("Aggregating zone-hours...");
    let hourly = pipeline.aggregate(trips)?;
    pb.finish_with_message(format!(
        "Aggregated {} trips into {} zone-hours",
        trip_count,
        hourly.height()
    ));

    ensure_parent(output)?;
    write_frame(&hourly, output, ExportFormat::Parquet)?;
    info!(path = %output.display(), rows = hourly.height(), "wrote zone-hours");
    Ok(())
}

/// Always annotates with whole-table zone statistics.
fn features(
    pipeline: &Pipeline,
    input: &Path,
    output: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    let pb = spinner("Building features...")?;
    let hourly = read_parquet(input)?;
    let builder = FeatureBuilder::new(pipeline.config().features.clone())?;
    let table = builder.build(hourly)?;
    pb.finish_with_message(format!("Built {} feature rows", table.height()));

    ensure_parent(output)?;
    write_frame(&table, output, format)?;
    info!(path = %output.display(), rows = table.height(), "wrote feature table");
    Ok(())
}

fn list_features(pipeline: &Pipeline) {
    let config = &pipeline.config().features;
    println!("Feature Columns");
    println!("===============\n");

    for category in FeatureCategory::ALL {
        let features = features_by_category(config, category);
        println!("{} ({})", category.name(), features.len());
        for feature in features {
            println!("  {:20} {}", feature.name, feature.description);
        }
        println!();
    }
}

fn split(
    pipeline: &Pipeline,
    input: &Path,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    let table = read_parquet(input)?;
    let splits = pipeline.split(&table)?;
    finish_splits(&splits, output_dir, format)
}

fn finish_splits(
    splits: &SplitFrames,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<(), Box<dyn Error>> {
    let paths = write_splits(output_dir, splits, format)?;
    let summary = SplitSummary::from_splits(splits)?;
    println!("{}", summary);
    for path in &paths {
        println!("  {}", path.display());
    }
    println!();
    Ok(())
}
