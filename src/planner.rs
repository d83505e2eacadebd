//! Move planning: distances and feeds to step counts and pulse rates.

use crate::config::units::{Millimeters, Rpm, Steps, StepsPerSec};
use crate::config::{FeedSpec, LeadscrewSpec};
use crate::error::{MotionError, Result};

/// A move ready for [`MotionCommand::step`](crate::motor::MotionCommand::step).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    /// Signed step count; the sign gives direction.
    pub steps: i32,
    /// Target pulse rate.
    pub steps_per_sec: StepsPerSec,
}

/// Converts millimeter moves into step moves for one lead screw.
#[derive(Debug, Clone, Copy)]
pub struct MovePlanner {
    screw: LeadscrewSpec,
}

impl MovePlanner {
    /// Create a planner for `screw`.
    pub fn new(screw: LeadscrewSpec) -> Self {
        Self { screw }
    }

    /// Lead screw parameters in use.
    #[inline]
    pub fn screw(&self) -> &LeadscrewSpec {
        &self.screw
    }

    /// Pulse rate for `feed` at spindle speed `rpm`.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidRate` when the rate is not strictly
    /// positive, e.g. a rotation feed with the spindle stopped.
    pub fn rate(&self, feed: &FeedSpec, rpm: Rpm) -> Result<StepsPerSec> {
        let rate = self.screw.velocity_to_rate(feed.velocity(rpm));
        if !rate.is_valid() {
            warn!("feed gives unusable rate {} steps/s", rate.value());
            return Err(MotionError::InvalidRate(rate.value()).into());
        }
        Ok(rate)
    }

    /// Move by `distance` from wherever the axis is.
    pub fn relative(&self, distance: Millimeters, feed: &FeedSpec, rpm: Rpm) -> Result<MoveRequest> {
        let steps_per_sec = self.rate(feed, rpm)?;
        Ok(MoveRequest {
            steps: clamp_steps(self.screw.mm_to_steps(distance)),
            steps_per_sec,
        })
    }

    /// Move to `target` measured from the zero point.
    pub fn absolute(
        &self,
        target: Millimeters,
        feed: &FeedSpec,
        rpm: Rpm,
        position: Steps,
    ) -> Result<MoveRequest> {
        let steps_per_sec = self.rate(feed, rpm)?;
        let target_steps = self.screw.mm_to_steps(target);
        Ok(MoveRequest {
            steps: clamp_steps(target_steps.saturating_sub(position.value())),
            steps_per_sec,
        })
    }
}

fn clamp_steps(steps: i64) -> i32 {
    steps.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
