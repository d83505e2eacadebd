//! Unit types for physical quantities.
//!
//! Provides type-safe representations of carriage travel, feed rates, spindle
//! speed and motor steps to prevent unit confusion at compile time.

use core::ops::{Add, Mul, Sub};

use serde::Deserialize;

/// Linear carriage distance in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f32);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Add for Millimeters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Millimeters {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Feed per spindle revolution (threading and rotation-based cuts).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MmPerRev(pub f32);

impl MmPerRev {
    /// Axial velocity in mm/s at the given spindle speed.
    #[inline]
    pub fn at(self, rpm: Rpm) -> MmPerSec {
        MmPerSec(self.0 * rpm.0 / 60.0)
    }
}

/// Feed per minute (time-based cuts and rapids).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MmPerMin(pub f32);

impl MmPerMin {
    /// Convert to mm/s.
    #[inline]
    pub fn per_sec(self) -> MmPerSec {
        MmPerSec(self.0 / 60.0)
    }
}

/// Axial velocity in mm/s.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MmPerSec(pub f32);

impl Mul<f32> for MmPerSec {
    type Output = StepsPerSec;

    /// Multiply by steps/mm.
    fn mul(self, steps_per_mm: f32) -> Self::Output {
        StepsPerSec(self.0 * steps_per_mm)
    }
}

/// Spindle speed in revolutions per minute.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Rpm(pub f32);

impl Rpm {
    /// Create a new Rpm value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Step pulse rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct StepsPerSec(pub f32);

impl StepsPerSec {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// True when the rate can be turned into a pulse interval.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Microseconds between pulses at this rate, saturating at `u32::MAX`.
    #[inline]
    pub fn to_delay_us(self) -> u32 {
        let delay = 1_000_000.0 / self.0;
        if delay >= u32::MAX as f32 {
            u32::MAX
        } else {
            delay as u32
        }
    }
}

/// Axis position in steps (absolute from the zero point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Get absolute value as u64.
    #[inline]
    pub fn abs(self) -> u64 {
        self.0.unsigned_abs()
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Steps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Millimeters.
    fn mm(self) -> Millimeters;
    /// Convert to MmPerRev.
    fn mm_per_rev(self) -> MmPerRev;
    /// Convert to MmPerMin.
    fn mm_per_min(self) -> MmPerMin;
    /// Convert to Rpm.
    fn rpm(self) -> Rpm;
}

impl UnitExt for f32 {
    #[inline]
    fn mm(self) -> Millimeters {
        Millimeters(self)
    }

    #[inline]
    fn mm_per_rev(self) -> MmPerRev {
        MmPerRev(self)
    }

    #[inline]
    fn mm_per_min(self) -> MmPerMin {
        MmPerMin(self)
    }

    #[inline]
    fn rpm(self) -> Rpm {
        Rpm(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_per_rev_velocity() {
        // 1.5 mm/rev at 120 rpm = 3 mm/s
        let v = 1.5f32.mm_per_rev().at(120.0f32.rpm());
        assert!((v.0 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_feed_per_min_velocity() {
        let v = 120.0f32.mm_per_min().per_sec();
        assert!((v.0 - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_to_delay() {
        assert_eq!(StepsPerSec(2000.0).to_delay_us(), 500);
        assert_eq!(StepsPerSec(1e-9).to_delay_us(), u32::MAX);
        assert!(!StepsPerSec(0.0).is_valid());
        assert!(!StepsPerSec(-3.0).is_valid());
        assert!(!StepsPerSec(f32::NAN).is_valid());
    }
}
