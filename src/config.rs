//! Configuration file handling.
//!
//! Settings come from an optional `shelter_report.toml`; command-line flags
//! override whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "shelter_report.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the two CSV resources live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_dataset")]
    pub dataset: PathBuf,

    #[serde(default = "default_mapping")]
    pub mapping: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            mapping: default_mapping(),
        }
    }
}

fn default_dataset() -> PathBuf {
    PathBuf::from("nkc-dataset.csv")
}

fn default_mapping() -> PathBuf {
    PathBuf::from("facility_name_county_mapping.csv")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV and JSON artifacts are written to.
    #[serde(default = "default_out_dir")]
    pub dir: PathBuf,

    /// Rows shown in each console preview table.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_preview_rows() -> usize {
    5
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// `Ok(None)` when there is no file in the working directory.
    pub fn load_default() -> Result<Option<Self>> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Explicit command-line values win over the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dataset) = args.dataset {
            self.input.dataset = dataset.clone();
        }
        if let Some(ref mapping) = args.mapping {
            self.input.mapping = mapping.clone();
        }
        if let Some(ref dir) = args.out_dir {
            self.output.dir = dir.clone();
        }
        if let Some(rows) = args.preview_rows {
            self.output.preview_rows = rows;
        }
    }

    pub fn default_toml() -> String {
        // Serializing a default config cannot fail.
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}
