//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::input::mouse::WHEEL_RESOLUTION;
use crate::input::wheel::{WheelRamp, MAX_RESOLUTION, MIN_RESOLUTION, RAMP_NS, REPEAT_PERIOD_MS};

/// Mouse decoding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseConfig {
    /// High-resolution units per physical wheel detent
    #[serde(default = "default_wheel_resolution")]
    pub wheel_resolution: i32,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            wheel_resolution: default_wheel_resolution(),
        }
    }
}

fn default_wheel_resolution() -> i32 {
    WHEEL_RESOLUTION
}

/// Wheel emulation for the keypad direction keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Milliseconds between synthetic wheel ticks
    #[serde(default = "default_repeat_period_ms")]
    pub repeat_period_ms: u64,

    /// Nanoseconds of holding until the full tick magnitude is reached
    #[serde(default = "default_ramp_ns")]
    pub ramp_ns: u64,

    /// Tick magnitude right after the key goes down
    #[serde(default = "default_min_resolution")]
    pub min_resolution: i32,

    /// Tick magnitude once the ramp completes
    #[serde(default = "default_max_resolution")]
    pub max_resolution: i32,
}

impl WheelConfig {
    /// Ramp parameters for the emulator
    pub fn ramp(&self) -> WheelRamp {
        WheelRamp {
            min_resolution: self.min_resolution,
            max_resolution: self.max_resolution,
            ramp_ns: self.ramp_ns,
        }
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.repeat_period_ms)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            repeat_period_ms: default_repeat_period_ms(),
            ramp_ns: default_ramp_ns(),
            min_resolution: default_min_resolution(),
            max_resolution: default_max_resolution(),
        }
    }
}

fn default_repeat_period_ms() -> u64 {
    REPEAT_PERIOD_MS
}

fn default_ramp_ns() -> u64 {
    RAMP_NS
}

fn default_min_resolution() -> i32 {
    MIN_RESOLUTION
}

fn default_max_resolution() -> i32 {
    MAX_RESOLUTION
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format ("pretty", "compact", "json")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
