//! CLI configuration
//!
//! Read from `~/.config/dhis2-cli/config.toml` when present. Every key is
//! optional and falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the metadata payload is written before submission
    pub payload_path: PathBuf,
    /// Sections posted per request by the section fix-up
    pub section_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payload_path: PathBuf::from("payload.json"),
            section_chunk_size: 10,
        }
    }
}

impl Config {
    /// `~/.config/dhis2-cli`
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dhis2-cli")
    }

    /// Load the user configuration, or defaults when no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_dir().join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
