//! Analysis settings loaded from `sccdag.toml`.
//!
//! Every field has a default, so an empty or missing file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::graph::WeightPolicy;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "sccdag.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub condensation: CondensationConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CondensationConfig {
    /// How parallel inter-component edges are merged.
    #[serde(default)]
    pub weight_policy: WeightPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Source component for the shortest-path report. Clamped to the last
    /// component when out of range.
    #[serde(default)]
    pub source: usize,
    #[serde(default = "default_true")]
    pub critical_path: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: 0,
            critical_path: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory scanned for `*.json` datasets when no path is given.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Parse a config document.
///
/// # Errors
///
/// Returns an error if `content` is not valid TOML for [`AnalysisConfig`].
pub fn parse_config(content: &str) -> Result<AnalysisConfig> {
    toml::from_str::<AnalysisConfig>(content).context("Failed to parse analysis config")
}

/// Load settings from `path`, or from `./sccdag.toml` when `path` is `None`.
///
/// A missing default file yields [`AnalysisConfig::default`]; a missing
/// explicit file is an error.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = match path {
        Some(explicit) => explicit.to_path_buf(),
        None => {
            let fallback = PathBuf::from(CONFIG_FILE_NAME);
            if !fallback.exists() {
                return Ok(AnalysisConfig::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<AnalysisConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
