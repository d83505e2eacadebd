//! Spindle sensing and thread-sync settings.

use serde::Deserialize;

use super::units::Rpm;

/// Smallest accepted thread-sync poll interval in milliseconds.
pub const MIN_SYNC_INTERVAL_MS: u32 = 10;

/// `[spindle]` section from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SpindleConfig {
    /// Spindle speed assumed until threading mode measures one.
    #[serde(default = "default_initial_rpm")]
    pub initial_rpm: Rpm,

    /// Sensor edges older than this are ignored (ms).
    #[serde(default = "default_sample_max_age")]
    pub sample_max_age_ms: u32,

    /// Thread-sync poll interval (ms).
    #[serde(default = "default_sync_interval")]
    pub sync_interval_ms: u32,
}

fn default_initial_rpm() -> Rpm {
    Rpm(200.0)
}

fn default_sample_max_age() -> u32 {
    6000
}

fn default_sync_interval() -> u32 {
    500
}

impl Default for SpindleConfig {
    fn default() -> Self {
        Self {
            initial_rpm: default_initial_rpm(),
            sample_max_age_ms: default_sample_max_age(),
            sync_interval_ms: default_sync_interval(),
        }
    }
}
