//! Session settings
//!
//! Fixed when a session is created. Loaded from JSON; missing fields fall back
//! to the reference values in [`crate::consts`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{Error, Result};

/// Where the moving point starts on a fresh terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartPosition {
    #[default]
    FirstVertex,
    Centroid,
    Random,
}

impl StartPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartPosition::FirstVertex => "first_vertex",
            StartPosition::Centroid => "centroid",
            StartPosition::Random => "random",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first_vertex" | "first" | "vertex" => Some(StartPosition::FirstVertex),
            "centroid" | "center" => Some(StartPosition::Centroid),
            "random" => Some(StartPosition::Random),
            _ => None,
        }
    }
}

/// Chaos game and loop timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Terrain ===
    /// Number of anchor vertices
    pub vertex_count: usize,
    /// Fraction of the distance jumped toward the chosen vertex, in (0, 1)
    pub jump_fraction: f64,
    /// Starting point of the moving point
    pub start: StartPosition,
    /// RNG seed (None = fresh seed per terrain)
    pub seed: Option<u64>,
    /// Retained history points; eviction keeps at least this many and fewer
    /// than this plus one chunk (None = unbounded)
    pub history_capacity: Option<usize>,

    // === Timing ===
    /// Terrain updates per compute batch
    pub batch_size: usize,
    /// Sleep between compute batches (ms)
    pub batch_interval_ms: u64,
    /// Redraw request cadence (ms)
    pub refresh_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vertex_count: NUM_VERTICES,
            jump_fraction: JUMP_FRACTION,
            start: StartPosition::FirstVertex,
            seed: None,
            history_capacity: Some(HISTORY_CAPACITY),

            batch_size: BATCH_SIZE,
            batch_interval_ms: BATCH_INTERVAL_MS,
            refresh_interval_ms: REFRESH_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfiguration(msg));
        if self.vertex_count == 0 {
            return invalid("vertex_count must be at least 1".into());
        }
        if !(self.jump_fraction > 0.0 && self.jump_fraction < 1.0) {
            return invalid(format!("jump_fraction {} outside (0, 1)", self.jump_fraction));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be at least 1".into());
        }
        if self.batch_interval_ms == 0 || self.refresh_interval_ms == 0 {
            return invalid("intervals must be non-zero".into());
        }
        if self.history_capacity == Some(0) {
            return invalid("history_capacity must be non-zero".into());
        }
        Ok(())
    }

    pub fn batch_interval(&self) -> Duration {
        Duration::from_millis(self.batch_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}
