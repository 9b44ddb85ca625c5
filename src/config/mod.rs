//! Configuration management
//!
//! Handles loading, clamping, and persistence of the tunable parameters.
//! Settings are stored as a flat JSON document; loading merges stored
//! values over hard-coded defaults (missing keys fall back to the default,
//! unknown keys are ignored), and a corrupt document is logged and replaced
//! by the defaults wholesale.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod shared;

pub use shared::SharedConfig;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config document failed
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config document is not valid JSON
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable parameters, shared between the presentation layer and the
/// actuation loop.
///
/// The crosshair fields are overlay-only: they are persisted and clamped
/// like everything else but never consumed by the loop's activation
/// decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Master enable for the compensation loop
    pub recoil_compensation: bool,

    /// Add randomized horizontal jitter per active tick
    pub bloom_reduction: bool,

    /// Gate activation on the secondary (ADS) trigger
    pub require_ads: bool,

    /// Show the crosshair overlay
    pub show_crosshair: bool,

    /// Total vertical displacement per active tick, pixels (1-20)
    pub recoil_strength: i32,

    /// Number of sub-steps each tick's displacement is split into (1-10)
    pub smoothing: i32,

    /// Symmetric bound for random horizontal jitter, pixels (0-10)
    pub bloom_intensity: i32,

    /// Crosshair color as a hex string
    pub crosshair_color: String,

    /// Crosshair arm length, pixels
    pub crosshair_size: i32,

    /// Crosshair line thickness, pixels
    pub crosshair_thickness: i32,

    /// Prefer the serial hardware backend over synthetic input
    pub use_makcu: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recoil_compensation: true,
            bloom_reduction: false,
            require_ads: true,
            show_crosshair: false,
            recoil_strength: 11,
            smoothing: 3,
            bloom_intensity: 2,
            crosshair_color: "#BF40BF".to_string(),
            crosshair_size: 5,
            crosshair_thickness: 2,
            use_makcu: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON document, merging stored values over
    /// the defaults.
    ///
    /// Missing keys take their default; unknown keys are ignored. Returns
    /// an error for an unreadable or unparseable document so the caller can
    /// log it and fall back to [`Config::default`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config.clamped())
    }

    /// Persist the full current snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default on-disk location for the config document.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cloud-recoil")
            .join("config.json")
    }

    /// Clamp slider-backed integer fields to their valid ranges.
    ///
    /// The scheduler additionally clamps `smoothing` to at least 1 on every
    /// tick; it never trusts the stored value.
    pub fn clamped(mut self) -> Self {
        self.recoil_strength = self.recoil_strength.clamp(1, 20);
        self.smoothing = self.smoothing.clamp(1, 10);
        self.bloom_intensity = self.bloom_intensity.clamp(0, 10);
        self.crosshair_size = self.crosshair_size.clamp(1, 50);
        self.crosshair_thickness = self.crosshair_thickness.clamp(1, 10);
        self
    }
}
