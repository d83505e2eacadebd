//! Lead screw geometry and the step/mm conversions derived from it.

use heapless::String;
use serde::Deserialize;

use super::units::{Millimeters, MmPerSec, Steps, StepsPerSec};

/// Lead screw section from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadscrewConfig {
    /// Axis label shown in position reports.
    #[serde(default = "default_axis")]
    pub axis: String<8>,

    /// Carriage travel per motor revolution, including any pulley reduction.
    #[serde(default = "default_pitch", rename = "pitch_mm")]
    pub pitch: Millimeters,

    /// Motor microsteps per revolution.
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

fn default_axis() -> String<8> {
    let mut axis = String::new();
    let _ = axis.push('Z');
    axis
}

fn default_pitch() -> Millimeters {
    // 3 mm screw behind a 32:50 pulley pair
    Millimeters(3.0 * 32.0 / 50.0)
}

fn default_steps_per_revolution() -> u32 {
    800
}

impl Default for LeadscrewConfig {
    fn default() -> Self {
        Self {
            axis: default_axis(),
            pitch: default_pitch(),
            steps_per_revolution: default_steps_per_revolution(),
            invert_direction: false,
        }
    }
}

/// Derived lead screw parameters, fixed for the session.
///
/// These are computed once at startup and used for all move planning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadscrewSpec {
    /// Travel per motor revolution in mm.
    pub pitch: f32,

    /// Steps per motor revolution.
    pub steps_per_rev: f32,

    /// Steps per mm of carriage travel.
    pub steps_per_mm: f32,
}

impl LeadscrewSpec {
    /// Build a spec from pitch and steps per revolution.
    pub fn new(pitch: Millimeters, steps_per_revolution: u32) -> Self {
        let steps_per_rev = steps_per_revolution as f32;
        Self {
            pitch: pitch.0,
            steps_per_rev,
            steps_per_mm: steps_per_rev / pitch.0,
        }
    }

    /// Compute the spec from the lead screw section.
    pub fn from_config(config: &LeadscrewConfig) -> Self {
        Self::new(config.pitch, config.steps_per_revolution)
    }

    /// Steps for a distance, rounded half away from zero.
    #[inline]
    pub fn mm_to_steps(&self, distance: Millimeters) -> i64 {
        libm::roundf(distance.0 * self.steps_per_rev / self.pitch) as i64
    }

    /// Carriage position in mm for a step count.
    #[inline]
    pub fn steps_to_mm(&self, steps: Steps) -> Millimeters {
        Millimeters(steps.0 as f32 * self.pitch / self.steps_per_rev)
    }

    /// Convert an axial velocity to a pulse rate.
    #[inline]
    pub fn velocity_to_rate(&self, velocity: MmPerSec) -> StepsPerSec {
        velocity * self.steps_per_mm
    }
}

impl Default for LeadscrewSpec {
    fn default() -> Self {
        Self::from_config(&LeadscrewConfig::default())
    }
}
