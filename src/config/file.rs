use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::render::{RenderMode, RenderOptions, colorizer::DEFAULT_RAMP};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Rendering defaults, overridable from the command line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    /// How cells are colored
    #[serde(default)]
    pub mode: RenderMode,

    /// Luminance ramp for ascii mode, darkest glyph first
    #[serde(default = "default_ramp")]
    pub ramp: String,

    /// Rows left free below the image for the shell prompt
    #[serde(default = "default_reserved_rows")]
    pub reserved_rows: u16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            mode: RenderMode::default(),
            ramp: default_ramp(),
            reserved_rows: default_reserved_rows(),
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            mode: self.mode,
            ramp: self.ramp.clone(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// error | warn | info | debug | trace
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to this (daily rotated) file instead of stderr
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

// Default value functions for serde
fn default_ramp() -> String {
    DEFAULT_RAMP.to_string()
}

fn default_reserved_rows() -> u16 {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Trait for configuration storage
pub trait ConfigStorage {
    /// Load configuration, falling back to defaults when none exists
    fn load(&self) -> Result<Config>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Config> {
        toml::from_str(contents).map_err(|err| RenderError::Config {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            log::info!("Config file not found at {:?}, using defaults", self.path);
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| RenderError::Io {
            path: self.path.clone(),
            source,
        })?;
        let config = Self::parse(&self.path, &contents)?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: mode={:?}, reserved_rows={}, log level={}",
            config.render.mode,
            config.render.reserved_rows,
            config.logging.level
        );

        Ok(config)
    }
}
