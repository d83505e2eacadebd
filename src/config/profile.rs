//! Velocity profile and command-interface timing parameters.

use serde::Deserialize;

/// `[profile]` section from TOML.
///
/// `start_delay_us` larger than a move's target delay enables the ramp;
/// smaller disables it. Raise it to ramp slow feeds too, and raise
/// `acceleration_step_us` for a steeper ramp.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    /// Pulse interval every move starts and ends at (µs).
    #[serde(default = "default_start_delay")]
    pub start_delay_us: u32,

    /// Interval change per profile adjustment (µs).
    #[serde(default = "default_acceleration_step")]
    pub acceleration_step_us: u32,

    /// Minimum time between profile adjustments (µs).
    #[serde(default = "default_accel_update_interval")]
    pub accel_update_interval_us: u32,

    /// Time the direction output is held before the first pulse (µs).
    #[serde(default = "default_direction_settle")]
    pub direction_settle_us: u32,

    /// Give up waiting for the previous move after this long (µs).
    /// Absent means wait forever.
    #[serde(default)]
    pub max_wait_us: Option<u32>,
}

fn default_start_delay() -> u32 {
    1500
}

fn default_acceleration_step() -> u32 {
    10
}

fn default_accel_update_interval() -> u32 {
    // 500 adjustments per second
    1_000_000 / 500
}

fn default_direction_settle() -> u32 {
    10
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            start_delay_us: default_start_delay(),
            acceleration_step_us: default_acceleration_step(),
            accel_update_interval_us: default_accel_update_interval(),
            direction_settle_us: default_direction_settle(),
            max_wait_us: None,
        }
    }
}
