//! Game settings and preferences
//!
//! Stored as a JSON file next to the level data. Missing fields fall back to
//! their defaults, so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::sim::ChartScale;
use crate::tuning::{Difficulty, PhysicsTuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty selected on startup
    pub difficulty: Difficulty,
    /// Directory holding level records, the score book and chart files
    pub data_dir: PathBuf,
    /// Stretch applied to chart rows
    pub chart_scale: ChartScale,
    /// Physics overrides; anything omitted keeps its default
    pub tuning: PhysicsTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            data_dir: PathBuf::from("data"),
            chart_scale: ChartScale::default(),
            tuning: PhysicsTuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    ///
    /// A missing or unreadable file is not an error.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
