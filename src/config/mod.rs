//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments
//!
//! Every field has a default, so an empty file is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::input::mouse::MAX_WHEEL_RESOLUTION;

pub mod types;

pub use types::{LoggingConfig, MouseConfig, WheelConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Mouse decoding configuration
    #[serde(default)]
    pub mouse: MouseConfig,
    /// Wheel emulation configuration
    #[serde(default)]
    pub wheel: WheelConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config {
            mouse: MouseConfig::default(),
            wheel: WheelConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WHEEL_RESOLUTION).contains(&self.mouse.wheel_resolution) {
            anyhow::bail!(
                "wheel_resolution must be between 1 and {}, got {}",
                MAX_WHEEL_RESOLUTION,
                self.mouse.wheel_resolution
            );
        }

        if self.wheel.repeat_period_ms == 0 {
            anyhow::bail!("repeat_period_ms must be at least 1");
        }

        if self.wheel.ramp_ns == 0 {
            anyhow::bail!("ramp_ns must be at least 1");
        }

        if self.wheel.min_resolution <= 0 {
            anyhow::bail!(
                "min_resolution must be positive, got {}",
                self.wheel.min_resolution
            );
        }

        if self.wheel.min_resolution > self.wheel.max_resolution {
            anyhow::bail!(
                "min_resolution ({}) cannot be greater than max_resolution ({})",
                self.wheel.min_resolution,
                self.wheel.max_resolution
            );
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, log_level: Option<String>, log_format: Option<String>) -> Self {
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        if let Some(format) = log_format {
            self.logging.format = format;
        }

        self
    }
}
