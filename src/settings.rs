//! Simulation settings
//!
//! Loaded from a JSON file by the shell; every field has a default so partial
//! files are accepted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{EntropyMode, PixelFormat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Pixel layout of the draw buffer
    pub pixel_format: PixelFormat,

    // === Randomness ===
    /// Run seed for reproducibility (random when absent)
    pub seed: Option<u64>,
    /// Batched digit reuse or one fresh draw per use
    pub entropy: EntropyMode,

    // === Rules ===
    /// Material rule file (builtin rules when absent)
    pub materials_path: Option<PathBuf>,

    // === Brush ===
    pub brush_radius: u16,
    pub min_brush_radius: u16,
    pub max_brush_radius: u16,

    // === Pacing ===
    /// Target milliseconds per tick
    pub frame_budget_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SIMULATION_WIDTH,
            height: SIMULATION_HEIGHT,
            pixel_format: PixelFormat::Argb8888,

            seed: None,
            entropy: EntropyMode::Batched,

            materials_path: None,

            brush_radius: DEFAULT_DRAW_RADIUS,
            min_brush_radius: MIN_DRAW_RADIUS,
            max_brush_radius: MAX_DRAW_RADIUS,

            frame_budget_ms: FRAME_BUDGET_MS,
        }
    }
}

impl Settings {
    /// Parse settings strictly
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a file, falling back to defaults when the file is
    /// missing or malformed
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("No settings at {} ({}), using defaults", path.display(), e),
        }
        Self::default()
    }

    /// Serialize for writing back to disk
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Brush radius clamped to the configured limits
    pub fn clamp_brush_radius(&self, radius: i32) -> u16 {
        radius.clamp(self.min_brush_radius as i32, self.max_brush_radius as i32) as u16
    }

    /// Configured brush radius, clamped
    pub fn effective_brush_radius(&self) -> u16 {
        self.clamp_brush_radius(self.brush_radius as i32)
    }

    /// Target duration of one tick
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms as u64)
    }
}
