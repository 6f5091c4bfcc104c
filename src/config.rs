//! Configuration file handling.
//!
//! Loaded from `<config dir>/termsnap/config.toml`. Every field has a default,
//! so a missing file or a partial one is fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::raster::DEFAULT_ZOOM;
use crate::recording::DEFAULT_FPS;
use crate::render::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::session::StoreSettings;
use crate::theme::DEFAULT_THEME;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TERMSNAP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Append a JSONL entry per session operation to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,
    pub terminal: TerminalConfig,
    pub render: RenderConfig,
    pub recording: RecordingConfig,
}

/// Size of new terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub cols: u16,
    pub rows: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { cols: 120, rows: 40 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub theme: String,
    pub font_size: f64,
    pub font_family: String,
    /// Pixel scale applied when rasterizing
    pub zoom: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub fps: u32,
    /// Root of all session directories
    pub output_dir: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            output_dir: PathBuf::from("/tmp/termsnap"),
        }
    }
}

impl Config {
    /// Location of the config file: `$TERMSNAP_CONFIG`, else the platform
    /// config directory.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("termsnap").join("config.toml"))
    }

    /// Load the config file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Session defaults derived from this config.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            output_dir: self.recording.output_dir.clone(),
            cols: self.terminal.cols,
            rows: self.terminal.rows,
            theme: self.render.theme.clone(),
            font_size: self.render.font_size,
            font_family: self.render.font_family.clone(),
            ..StoreSettings::default()
        }
    }
}
