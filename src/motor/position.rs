//! Position tracking for the lead screw axis.
//!
//! The step count is shared between the tick handler (its only writer while
//! a move runs) and the command loop (reads, and zeroing while idle). Plain
//! atomic loads and stores are used so targets without compare-and-swap work.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::config::units::{Millimeters, Steps};
use crate::config::LeadscrewSpec;
use crate::motion::Direction;

/// Axis position tracker.
///
/// Maintains absolute position in steps and provides unit conversions.
#[derive(Debug, Default)]
pub struct AxisPosition {
    /// Current position in steps (from the zero point)
    steps: AtomicI32,
}

impl AxisPosition {
    /// Create a tracker at the zero point.
    #[inline]
    pub const fn new() -> Self {
        Self {
            steps: AtomicI32::new(0),
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        Steps(self.steps.load(Ordering::Acquire) as i64)
    }

    /// Get current position in mm.
    #[inline]
    pub fn mm(&self, screw: &LeadscrewSpec) -> Millimeters {
        screw.steps_to_mm(self.steps())
    }

    /// Record one emitted pulse. Single writer only.
    #[inline]
    pub(crate) fn advance(&self, direction: Direction) {
        let steps = self.steps.load(Ordering::Relaxed);
        self.steps
            .store(steps.wrapping_add(direction.sign()), Ordering::Release);
    }

    /// Reset position to the zero point.
    #[inline]
    pub(crate) fn reset(&self) {
        self.steps.store(0, Ordering::Release);
    }
}
