//! Velocity profile parameters.
//!
//! The profile is expressed as pulse intervals rather than speeds: a move
//! starts at `start_delay`, ramps by `acceleration_step` toward
//! `target_delay`, and ramps back to `start_delay` before it ends.

use crate::config::ProfileConfig;

/// Direction of carriage motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    Positive,
    /// Negative step count.
    Negative,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

/// Ramp parameters supplied at startup and tunable between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampSettings {
    /// Interval a move begins and ends at (µs).
    pub start_delay: u32,
    /// Interval change per adjustment (µs).
    pub acceleration_step: u32,
    /// Minimum time between adjustments (µs).
    pub accel_update_interval: u32,
}

impl RampSettings {
    /// Take the ramp settings from the profile section.
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self {
            start_delay: config.start_delay_us,
            acceleration_step: config.acceleration_step_us,
            accel_update_interval: config.accel_update_interval_us,
        }
    }
}

impl Default for RampSettings {
    fn default() -> Self {
        Self::from_config(&ProfileConfig::default())
    }
}

/// Point-in-time copy of the generator's velocity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityProfile {
    /// Interval used for the next pulse (µs).
    pub current_delay: u32,
    /// Interval the move is converging to (µs).
    pub target_delay: u32,
    /// Interval every move starts and ends at (µs).
    pub start_delay: u32,
    /// Interval change per adjustment (µs).
    pub acceleration_step: u32,
    /// Minimum time between adjustments (µs).
    pub accel_update_interval: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        assert_eq!(Direction::from_steps(10), Direction::Positive);
        assert_eq!(Direction::from_steps(-10), Direction::Negative);
        assert_eq!(Direction::Negative.sign(), -1);
    }

    #[test]
    fn test_ramp_defaults() {
        let ramp = RampSettings::default();
        assert_eq!(ramp.start_delay, 1500);
        assert_eq!(ramp.acceleration_step, 10);
        assert_eq!(ramp.accel_update_interval, 2000);
    }
}
