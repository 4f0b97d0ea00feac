//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Aggregate shelter intake and outcome statistics by year and county.
///
/// Reads the shelter dataset and the facility to county mapping, prints a
/// preview of every dashboard question and writes CSV/JSON artifacts.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Shelter dataset CSV
    #[arg(short, long, value_name = "FILE", env = "SHELTER_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Facility to county mapping CSV
    #[arg(short, long, value_name = "FILE", env = "SHELTER_COUNTY_MAPPING")]
    pub mapping: Option<PathBuf>,

    /// Directory for the generated CSV and JSON files
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Rows shown in each console preview table
    #[arg(long, value_name = "COUNT")]
    pub preview_rows: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for shelter_report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a default shelter_report.toml and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }
        if self.preview_rows == Some(0) {
            return Err("Preview rows must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Log filter from `RUST_LOG`-style directives, falling back to the
    /// level picked by `--verbose`/`--quiet` when none are given.
    pub fn log_filter(&self, directives: Option<&str>) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.log_level()).into())
            .parse_lossy(directives.unwrap_or_default())
    }
}
