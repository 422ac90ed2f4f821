//! Configuration file handling
//!
//! This module manages loading and parsing configuration from ~/.shls.toml

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Display options
    #[serde(default)]
    pub display: DisplayConfig,

    /// Interactive shell options
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of columns in the vertical and horizontal grids
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Spaces added to the widest name of a grid column
    #[serde(default = "default_column_padding")]
    pub column_padding: usize,

    /// Colorize entry names when writing to a terminal
    #[serde(default)]
    pub color: bool,
}

/// Shell configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Fixed prompt; the current directory is shown when unset
    #[serde(default)]
    pub prompt: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            column_padding: default_column_padding(),
            color: false,
        }
    }
}

impl Config {
    /// Load configuration from ~/.shls.toml
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            log::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        log::debug!("Loading config from {:?}", config_path);
        let content = fs::read_to_string(config_path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)?;
        if config.display.columns == 0 {
            return Err(Error::config("display.columns must be at least 1"));
        }

        Ok(config)
    }
}

/// Get the path to the config file
fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::config("Could not determine home directory"))?;

    Ok(home.join(".shls.toml"))
}

fn default_columns() -> usize {
    5
}

fn default_column_padding() -> usize {
    3
}
