//! Tunable constants, persisted in the OS config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const STATE_FILE: &str = "state.json";

/// Thresholds and timings for the marker pipeline and the range slider.
///
/// Every field has a default, so a partial `settings.json` only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Points closer than this (great-circle km) form a close group.
    pub close_threshold_km: f64,
    /// Per-axis degree difference below which a location coincides with a project.
    pub coincidence_threshold_deg: f64,
    /// North-east nudge applied to a coincident location, in degrees.
    pub offset_deg: f64,
    /// Nudge used when both the location and its project are in close groups.
    pub close_offset_deg: f64,
    /// Pixel distance from a slider edge that grabs that edge.
    pub edge_zone_px: f32,
    /// Minimum spacing between interval notifications, in milliseconds.
    pub throttle_ms: u64,
    /// Age after which a persisted range is discarded, in seconds.
    pub freshness_secs: u64,
    /// Span of the "all time" preset, in days.
    pub all_time_days: i64,
    /// Smallest slider range, in days.
    pub min_range_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            close_threshold_km: 0.05,
            coincidence_threshold_deg: 0.02,
            offset_deg: 0.005,
            close_offset_deg: 0.010,
            edge_zone_px: 20.0,
            throttle_ms: 50,
            freshness_secs: 5 * 60,
            all_time_days: 3650,
            min_range_days: 30,
        }
    }
}

impl Settings {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Locations of the settings file and the key-value state file.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub settings: PathBuf,
    pub state: PathBuf,
}

impl ConfigPaths {
    /// Resolve the per-user config directory, or the working directory when
    /// the platform offers none.
    pub fn discover() -> Self {
        let dir = directories::ProjectDirs::from("", "", "ZigZagMap")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(&dir)
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            settings: dir.join(SETTINGS_FILE),
            state: dir.join(STATE_FILE),
        }
    }
}
