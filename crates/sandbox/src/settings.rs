//! Sandbox settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a new marker picks its numeric label suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Smallest positive suffix not used by a live marker (freed numbers come back)
    #[default]
    SmallestUnused,
    /// One past the highest suffix ever issued in the session
    Monotonic,
}

/// Marker labelling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    pub policy: LabelPolicy,
    /// Label prefix, e.g. "S" for S1, S2, ...
    pub prefix: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            policy: LabelPolicy::SmallestUnused,
            prefix: "S".to_string(),
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum undo depth; oldest entries are dropped
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

/// Validation thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Minimum share of relevant grid cells that must hold a marker
    pub coverage_threshold: f64,
    /// Reference match radius, in cell sizes
    pub reference_tolerance: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            coverage_threshold: 0.6,
            reference_tolerance: 1.0,
        }
    }
}

/// Canvas view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub initial_zoom: f64,
    /// Zoom change per wheel notch
    pub zoom_step: f64,
    /// Delay between guided playback steps, milliseconds
    pub playback_delay_ms: u64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            initial_zoom: 1.0,
            zoom_step: 0.1,
            playback_delay_ms: 800,
        }
    }
}

/// All sandbox settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SandboxSettings {
    #[serde(default)]
    pub labels: LabelSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

impl SandboxSettings {
    /// `settings.json` in the platform config directory
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sampling", "sampling-sandbox")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config directory, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`; a missing or malformed file gives the defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
