//! TOML configuration for the overlay.
//!
//! Example:
//!
//! ```toml
//! log_level = "debug"
//!
//! [gesture]
//! idle_timeout_ms = 200
//! click_timeout_ms = 50
//! move_threshold_dp = 5.0
//! move_ratio = 2.0
//!
//! [display]
//! density = 2.75
//!
//! [haptics]
//! enabled = true
//! duration_ms = 50
//! amplitude = 30
//! ```
//!
//! # Serde default values
//!
//! Every field carries a `#[serde(default = ...)]`, so an empty file, a
//! partial file, or no file at all yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use overlay_core::Density;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::control::HapticPulse;
use crate::application::touchpad::TouchpadTuning;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level overlay configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
}

/// Touchpad gesture timing and distances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
    #[serde(default = "default_click_timeout_ms")]
    pub click_timeout_ms: u64,
    /// Device-independent units.
    #[serde(default = "default_move_threshold_dp")]
    pub move_threshold_dp: f32,
    #[serde(default = "default_move_ratio")]
    pub move_ratio: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Raw pixels per device-independent unit.
    #[serde(default = "default_density")]
    pub density: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HapticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_haptic_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_haptic_amplitude")]
    pub amplitude: u8,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_idle_timeout_ms() -> u64 {
    200
}
fn default_click_timeout_ms() -> u64 {
    50
}
fn default_move_threshold_dp() -> f32 {
    5.0
}
fn default_move_ratio() -> f32 {
    2.0
}
fn default_density() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_haptic_duration_ms() -> u32 {
    50
}
fn default_haptic_amplitude() -> u8 {
    30
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            gesture: GestureConfig::default(),
            display: DisplayConfig::default(),
            haptics: HapticsConfig::default(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: default_idle_timeout_ms(),
            click_timeout_ms: default_click_timeout_ms(),
            move_threshold_dp: default_move_threshold_dp(),
            move_ratio: default_move_ratio(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            duration_ms: default_haptic_duration_ms(),
            amplitude: default_haptic_amplitude(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl OverlayConfig {
    /// Checks ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.display.density.is_finite() && self.display.density > 0.0) {
            return Err(ConfigError::Invalid {
                field: "display.density",
                reason: "must be a positive number",
            });
        }
        if !(self.gesture.move_ratio.is_finite() && self.gesture.move_ratio > 0.0) {
            return Err(ConfigError::Invalid {
                field: "gesture.move_ratio",
                reason: "must be a positive number",
            });
        }
        if !(self.gesture.move_threshold_dp.is_finite() && self.gesture.move_threshold_dp >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "gesture.move_threshold_dp",
                reason: "must not be negative",
            });
        }
        if self.gesture.idle_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "gesture.idle_timeout_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    pub fn tuning(&self) -> TouchpadTuning {
        TouchpadTuning {
            idle_timeout: Duration::from_millis(self.gesture.idle_timeout_ms),
            click_timeout: Duration::from_millis(self.gesture.click_timeout_ms),
            move_threshold_dp: self.gesture.move_threshold_dp,
            move_ratio: self.gesture.move_ratio,
        }
    }

    pub fn density(&self) -> Density {
        Density(self.display.density)
    }

    /// `None` when haptics are disabled.
    pub fn haptic_pulse(&self) -> Option<HapticPulse> {
        self.haptics.enabled.then_some(HapticPulse {
            duration_ms: self.haptics.duration_ms,
            amplitude: self.haptics.amplitude,
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads and validates the config at `path`, returning defaults if the file
/// does not exist.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Invalid`] if a value is out of range.
pub fn load_from(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<OverlayConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => OverlayConfig::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_to(path: &Path, config: &OverlayConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
