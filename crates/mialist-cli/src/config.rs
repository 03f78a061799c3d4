//! TOML configuration
//!
//! Every key is optional; missing keys fall back to the layout of the
//! standard attendance workbook.
//!
//! ```toml
//! [sheets]
//! source = "Sheet1"
//! destination = "MIA List 1"
//!
//! [layout]
//! name_column = 1
//! day_buffer = 6
//! last_week_offset_days = -5
//!
//! [destination]
//! clear_range = "A1:E1000"
//! header_range = "A1:E1"
//! last_week = { header_cell = "A1", label = "Last Week", anchor = "A3" }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mialist_core::{Destination, SheetLayout};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "mialist.toml";

/// Worksheet names inside the workbook
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetNames {
    /// Attendance sheet read by every command
    pub source: String,
    /// Sheet receiving the rosters
    pub destination: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            source: "Sheet1".into(),
            destination: "MIA List 1".into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sheets: SheetNames,
    pub layout: SheetLayout,
    pub destination: Destination,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `path`, or `mialist.toml` from the working directory, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config
            .layout
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
