//! JSON touch-trace scenarios for the replay binary.
//!
//! A scenario describes one surface, its controls, and a timestamped list of
//! raw touch events:
//!
//! ```json
//! {
//!   "surface": { "width": 1920, "height": 1080 },
//!   "controls": [
//!     { "name": "jump", "type": "button", "action": "Space",
//!       "geometry": { "x": 0.8, "y": 0.7, "width": 0.1, "height": 0.15 } },
//!     { "name": "pad", "type": "touchpad",
//!       "geometry": { "x": 0.0, "y": 0.0, "width": 0.5, "height": 1.0 } }
//!   ],
//!   "events": [
//!     { "pointer": 0, "phase": "down", "x": 100, "y": 100, "time_ms": 0 },
//!     { "pointer": 0, "phase": "up",   "x": 100, "y": 100, "time_ms": 30 }
//!   ]
//! }
//! ```
//!
//! Action codes accept either the raw integer or a name (`"KeyW"`,
//! `"MouseLeft"`, `"TriggerRight"`, `"keyboard"` for the text input).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use overlay_core::SurfaceSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::control::{ControlConfig, ControlServices};
use crate::application::surface::{ControlSurface, SurfaceError, TouchEvent};

/// Error type for loading and preparing a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("I/O error reading scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario layout: {0}")]
    Layout(#[from] SurfaceError),

    #[error("scenario surface must have a positive size")]
    EmptySurface,

    #[error("event {index} goes back in time ({time_ms} ms after {previous_ms} ms)")]
    OutOfOrder {
        index: usize,
        time_ms: u64,
        previous_ms: u64,
    },
}

/// A surface, its controls and a touch trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub surface: SurfaceSize,
    #[serde(default)]
    pub controls: Vec<ControlConfig>,
    #[serde(default)]
    pub events: Vec<TouchEvent>,
}

impl Scenario {
    /// Reads and validates a scenario file.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Io`], [`ScenarioError::Parse`], or a validation error.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Parse`] or a validation error.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks the surface size and that event times never decrease.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::EmptySurface`] or [`ScenarioError::OutOfOrder`].
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.surface.width > 0.0 && self.surface.height > 0.0) {
            return Err(ScenarioError::EmptySurface);
        }
        for (index, pair) in self.events.windows(2).enumerate() {
            if pair[1].time_ms < pair[0].time_ms {
                return Err(ScenarioError::OutOfOrder {
                    index: index + 1,
                    time_ms: pair[1].time_ms,
                    previous_ms: pair[0].time_ms,
                });
            }
        }
        Ok(())
    }

    /// Builds a surface holding this scenario's controls, first listed at the bottom.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Layout`] if a control is rejected by the surface.
    pub fn build_surface(
        &self,
        services: Arc<ControlServices>,
    ) -> Result<ControlSurface, ScenarioError> {
        let mut surface = ControlSurface::new(self.surface, services);
        surface.replace_layout(self.controls.clone())?;
        Ok(surface)
    }
}
