//! State shared between the tick handler and the command loop.
//!
//! Every field is an atomic so a single `MotionController` can sit in a
//! `static` and be borrowed by both contexts. Field ownership:
//!
//! - while `moving` is false the command loop may write anything;
//! - while `moving` is true only the tick handler writes, except for
//!   `target_delay` (thread sync) and `moving` itself (emergency stop).
//!
//! `moving` is always the last field written when a move is published and
//! the last field cleared when one completes. Publishing and the tick's
//! write-back share one critical section, so they never interleave even when
//! the tick runs on another thread.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::config::units::Steps;
use crate::config::ProfileConfig;
use crate::error::{MotionError, Result};
use crate::motor::AxisPosition;

use super::profile::{Direction, RampSettings, VelocityProfile};
use super::state::MotionState;

/// Motion state, velocity profile, step counters and axis position for one axis.
#[derive(Debug)]
pub struct MotionController {
    moving: AtomicBool,
    state: AtomicU8,
    negative: AtomicBool,
    position: AxisPosition,

    total_steps: AtomicU32,
    remaining_steps: AtomicU32,
    accel_steps: AtomicU32,
    decel_steps: AtomicU32,

    current_delay: AtomicU32,
    target_delay: AtomicU32,
    start_delay: AtomicU32,
    acceleration_step: AtomicU32,
    accel_update_interval: AtomicU32,
}

/// Point-in-time copy of a [`MotionController`], read field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSnapshot {
    /// Whether the generator is consuming a move.
    pub moving: bool,
    /// Phase of the move (Idle when not moving).
    pub state: MotionState,
    /// Direction of the current or last move.
    pub direction: Direction,
    /// Axis position.
    pub position: Steps,
    /// Step count of the current or last move.
    pub total_steps: u32,
    /// Steps not yet issued.
    pub remaining_steps: u32,
    /// Steps issued while accelerating.
    pub accel_steps: u32,
    /// Steps issued while decelerating.
    pub decel_steps: u32,
    /// Pulse interval profile.
    pub profile: VelocityProfile,
}

impl MotionSnapshot {
    /// Steps issued at steady speed.
    pub fn steady_steps(&self) -> u32 {
        self.issued_steps()
            .saturating_sub(self.accel_steps)
            .saturating_sub(self.decel_steps)
    }

    /// Steps issued so far in the current or last move.
    pub fn issued_steps(&self) -> u32 {
        self.total_steps.saturating_sub(self.remaining_steps)
    }
}

impl MotionController {
    /// Create an idle controller at position zero.
    pub const fn new(ramp: RampSettings) -> Self {
        Self {
            moving: AtomicBool::new(false),
            state: AtomicU8::new(MotionState::Idle.as_u8()),
            negative: AtomicBool::new(false),
            position: AxisPosition::new(),
            total_steps: AtomicU32::new(0),
            remaining_steps: AtomicU32::new(0),
            accel_steps: AtomicU32::new(0),
            decel_steps: AtomicU32::new(0),
            current_delay: AtomicU32::new(ramp.start_delay),
            target_delay: AtomicU32::new(ramp.start_delay),
            start_delay: AtomicU32::new(ramp.start_delay),
            acceleration_step: AtomicU32::new(ramp.acceleration_step),
            accel_update_interval: AtomicU32::new(ramp.accel_update_interval),
        }
    }

    /// Create an idle controller from the profile section.
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self::new(RampSettings::from_config(config))
    }

    /// Whether a move is in flight.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::Acquire)
    }

    /// Current motion state. Reads `Idle` whenever no move is in flight.
    #[inline]
    pub fn state(&self) -> MotionState {
        if self.is_moving() {
            self.raw_state()
        } else {
            MotionState::Idle
        }
    }

    /// Current axis position in steps.
    #[inline]
    pub fn position(&self) -> Steps {
        self.position.steps()
    }

    /// Axis position tracker.
    #[inline]
    pub fn axis(&self) -> &AxisPosition {
        &self.position
    }

    /// Steps not yet issued by the current move.
    #[inline]
    pub fn remaining_steps(&self) -> u32 {
        self.remaining_steps.load(Ordering::Acquire)
    }

    /// Current target pulse interval (µs).
    #[inline]
    pub fn target_delay(&self) -> u32 {
        self.target_delay.load(Ordering::Relaxed)
    }

    /// Current ramp settings.
    pub fn ramp(&self) -> RampSettings {
        RampSettings {
            start_delay: self.start_delay.load(Ordering::Relaxed),
            acceleration_step: self.acceleration_step.load(Ordering::Relaxed),
            accel_update_interval: self.accel_update_interval.load(Ordering::Relaxed),
        }
    }

    /// Set the interval moves start and end at. Applies to the next ramp.
    pub fn set_start_delay(&self, delay_us: u32) {
        self.start_delay.store(delay_us, Ordering::Relaxed);
    }

    /// Set the interval change per profile adjustment.
    pub fn set_acceleration_step(&self, step_us: u32) {
        self.acceleration_step.store(step_us, Ordering::Relaxed);
    }

    /// Read every field. Fields are read individually, not as one atomic unit.
    pub fn snapshot(&self) -> MotionSnapshot {
        let moving = self.is_moving();
        MotionSnapshot {
            moving,
            state: if moving { self.raw_state() } else { MotionState::Idle },
            direction: self.direction(),
            position: self.position(),
            total_steps: self.total_steps.load(Ordering::Acquire),
            remaining_steps: self.remaining_steps(),
            accel_steps: self.accel_steps.load(Ordering::Acquire),
            decel_steps: self.decel_steps.load(Ordering::Acquire),
            profile: VelocityProfile {
                current_delay: self.current_delay.load(Ordering::Relaxed),
                target_delay: self.target_delay(),
                start_delay: self.start_delay.load(Ordering::Relaxed),
                acceleration_step: self.acceleration_step.load(Ordering::Relaxed),
                accel_update_interval: self.accel_update_interval.load(Ordering::Relaxed),
            },
        }
    }

    /// Abandon the move in flight. Safe from either context and when idle.
    ///
    /// Steps already issued stand; the generator stops on its next tick.
    pub fn emergency_stop(&self) {
        self.moving.store(false, Ordering::Release);
        self.state.store(MotionState::Idle.as_u8(), Ordering::Relaxed);
    }

    /// Reset the axis position to zero.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::Busy` while a move is in flight.
    pub fn zero(&self) -> Result<()> {
        if self.is_moving() {
            return Err(MotionError::Busy.into());
        }
        self.position.reset();
        Ok(())
    }

    /// Publish a new move. The caller must have observed `!is_moving()`.
    ///
    /// Runs inside a critical section so the tick handler never sees a
    /// half-written move; `moving` is written last.
    pub(crate) fn publish(&self, direction: Direction, steps: u32, target_delay: u32) {
        critical_section::with(|_| {
            let start_delay = self.start_delay.load(Ordering::Relaxed);
            self.negative
                .store(direction == Direction::Negative, Ordering::Relaxed);
            self.target_delay.store(target_delay, Ordering::Relaxed);
            self.current_delay.store(start_delay, Ordering::Relaxed);
            self.accel_steps.store(0, Ordering::Relaxed);
            self.decel_steps.store(0, Ordering::Relaxed);
            self.total_steps.store(steps, Ordering::Relaxed);
            self.remaining_steps.store(steps, Ordering::Relaxed);
            self.state
                .store(MotionState::Accelerating.as_u8(), Ordering::Relaxed);
            self.moving.store(true, Ordering::Release);
        });
    }

    /// Change the target interval of the move in flight without touching
    /// its step count or direction.
    ///
    /// Returns `false` (and writes nothing) when idle or decelerating; the
    /// deceleration ramp always converges on the start delay.
    pub fn retarget(&self, target_delay: u32) -> bool {
        if !self.is_moving() || self.raw_state() == MotionState::Decelerating {
            return false;
        }
        self.target_delay.store(target_delay, Ordering::Relaxed);
        true
    }

    // Tick-context accessors. Only the pulse generator calls these.

    #[inline]
    pub(crate) fn raw_state(&self) -> MotionState {
        MotionState::from_u8(self.state.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn direction(&self) -> Direction {
        if self.negative.load(Ordering::Relaxed) {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    #[inline]
    pub(crate) fn load_profile(&self) -> VelocityProfile {
        VelocityProfile {
            current_delay: self.current_delay.load(Ordering::Relaxed),
            target_delay: self.target_delay.load(Ordering::Relaxed),
            start_delay: self.start_delay.load(Ordering::Relaxed),
            acceleration_step: self.acceleration_step.load(Ordering::Relaxed),
            accel_update_interval: self.accel_update_interval.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn store_progress(&self, state: MotionState, current_delay: u32) {
        self.current_delay.store(current_delay, Ordering::Relaxed);
        self.state.store(state.as_u8(), Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn store_target_delay(&self, target_delay: u32) {
        self.target_delay.store(target_delay, Ordering::Relaxed);
    }

    /// Account for one emitted pulse and return `(remaining, accel_steps)`.
    #[inline]
    pub(crate) fn record_pulse(&self, state: MotionState) -> (u32, u32) {
        let remaining = self
            .remaining_steps
            .load(Ordering::Relaxed)
            .saturating_sub(1);
        self.remaining_steps.store(remaining, Ordering::Release);

        let mut accel = self.accel_steps.load(Ordering::Relaxed);
        match state {
            MotionState::Accelerating => {
                accel += 1;
                self.accel_steps.store(accel, Ordering::Release);
            }
            MotionState::Decelerating => {
                let decel = self.decel_steps.load(Ordering::Relaxed) + 1;
                self.decel_steps.store(decel, Ordering::Release);
            }
            MotionState::Steady | MotionState::Idle => {}
        }

        self.position.advance(self.direction());
        (remaining, accel)
    }

    /// Mark the move finished. `moving` is cleared last.
    #[inline]
    pub(crate) fn finish(&self) {
        self.state.store(MotionState::Idle.as_u8(), Ordering::Relaxed);
        self.moving.store(false, Ordering::Release);
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(RampSettings::default())
    }
}
