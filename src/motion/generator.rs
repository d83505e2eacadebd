//! Step pulse generation - the periodic tick handler.
//!
//! `tick` is meant to run from a fixed-frequency timer interrupt (tens of
//! kHz). It keeps its own timestamps for when the next pulse and the next
//! profile adjustment are due, so the timer frequency only bounds timing
//! resolution.

use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};

use super::controller::MotionController;
use super::state::MotionState;

/// Trapezoidal step pulse generator for one axis.
///
/// Owns the STEP pin; everything it shares with the command loop lives in
/// the borrowed [`MotionController`].
pub struct StepPulseGenerator<'a, STEP>
where
    STEP: OutputPin,
{
    controller: &'a MotionController,

    /// STEP pin (one pulse per step).
    step_pin: STEP,

    /// When the last pulse was issued (µs).
    last_pulse_us: u32,

    /// When the profile was last adjusted (µs).
    last_adjust_us: u32,
}

impl<'a, STEP> StepPulseGenerator<'a, STEP>
where
    STEP: OutputPin,
{
    /// Create a generator driving `step_pin` for `controller`.
    pub fn new(controller: &'a MotionController, step_pin: STEP) -> Self {
        Self {
            controller,
            step_pin,
            last_pulse_us: 0,
            last_adjust_us: 0,
        }
    }

    /// The shared controller.
    #[inline]
    pub fn controller(&self) -> &'a MotionController {
        self.controller
    }

    /// Release the STEP pin.
    pub fn release(self) -> STEP {
        self.step_pin
    }

    /// Run one timer tick at monotonic time `now_us`.
    ///
    /// Returns `true` if a step pulse was emitted.
    ///
    /// The pulse and its bookkeeping run inside a critical section, the same
    /// one [`MotionCommand::step`](crate::MotionCommand::step) publishes under,
    /// so a tick preempted by an emergency stop can never write into the move
    /// published after it.
    pub fn tick(&mut self, now_us: u32) -> Result<bool> {
        if !self.controller.is_moving() {
            return Ok(false);
        }
        critical_section::with(|_| self.advance(now_us))
    }

    fn advance(&mut self, now_us: u32) -> Result<bool> {
        let ctl = self.controller;
        if !ctl.is_moving() {
            return Ok(false);
        }

        // Clock wrapped: restart the pulse interval instead of going negative.
        if now_us < self.last_pulse_us {
            self.last_pulse_us = now_us;
        }

        let mut state = ctl.raw_state();
        let profile = ctl.load_profile();
        let mut current = profile.current_delay;
        let target = profile.target_delay;
        let adjust_due =
            now_us.wrapping_sub(self.last_adjust_us) >= profile.accel_update_interval;

        match state {
            MotionState::Accelerating => {
                if current > target {
                    if adjust_due {
                        current = current.saturating_sub(profile.acceleration_step).max(target);
                        self.last_adjust_us = now_us;
                    }
                } else {
                    current = target;
                    state = MotionState::Steady;
                }
            }
            MotionState::Decelerating => {
                if current < target {
                    if adjust_due {
                        current = current.saturating_add(profile.acceleration_step).min(target);
                        self.last_adjust_us = now_us;
                    }
                } else {
                    current = target;
                }
            }
            // Re-pinned every tick so thread sync can retarget a running move.
            MotionState::Steady => current = target,
            MotionState::Idle => {}
        }

        let mut pulsed = false;
        if now_us - self.last_pulse_us >= current {
            if ctl.remaining_steps() == 0 {
                ctl.store_progress(state, current);
                ctl.finish();
                return Ok(false);
            }

            self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
            self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
            self.last_pulse_us = now_us;
            pulsed = true;

            let (remaining, accel_steps) = ctl.record_pulse(state);

            // Assumes the way down takes as many steps as the way up.
            if remaining <= accel_steps {
                state = MotionState::Decelerating;
                ctl.store_target_delay(profile.start_delay);
            }

            if remaining == 0 {
                ctl.store_progress(state, current);
                ctl.finish();
                return Ok(true);
            }
        }

        ctl.store_progress(state, current);
        Ok(pulsed)
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;
    use crate::motion::{Direction, RampSettings};

    /// Output pin that counts rising edges.
    #[derive(Default)]
    struct PulseCounter {
        high: bool,
        pulses: u32,
    }

    impl embedded_hal::digital::ErrorType for PulseCounter {
        type Error = Infallible;
    }

    impl OutputPin for PulseCounter {
        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            if !self.high {
                self.pulses += 1;
            }
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }
    }

    const TICK_US: u32 = 20;

    fn controller() -> MotionController {
        MotionController::new(RampSettings {
            start_delay: 1500,
            acceleration_step: 10,
            accel_update_interval: 2000,
        })
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let ctl = controller();
        let mut gen = StepPulseGenerator::new(&ctl, PulseCounter::default());
        for t in 0..1000 {
            assert!(!gen.tick(t * TICK_US).unwrap());
        }
        assert_eq!(gen.release().pulses, 0);
    }

    #[test]
    fn test_first_pulse_waits_start_delay() {
        let ctl = controller();
        ctl.publish(Direction::Positive, 3, 500);
        let mut gen = StepPulseGenerator::new(&ctl, PulseCounter::default());

        let mut first = None;
        for i in 0..200 {
            let now = i * TICK_US;
            if gen.tick(now).unwrap() {
                first = Some(now);
                break;
            }
        }
        assert_eq!(first, Some(1500));
    }

    #[test]
    fn test_three_step_move_completes() {
        let ctl = controller();
        ctl.publish(Direction::Negative, 3, 500);
        let mut gen = StepPulseGenerator::new(&ctl, PulseCounter::default());

        let mut now = 0;
        while ctl.is_moving() {
            gen.tick(now).unwrap();
            now += TICK_US;
        }

        assert_eq!(ctl.position().value(), -3);
        assert_eq!(ctl.remaining_steps(), 0);
        assert_eq!(ctl.state(), MotionState::Idle);
        assert_eq!(gen.release().pulses, 3);
    }

    #[test]
    fn test_clock_wrap_resets_reference() {
        let ctl = controller();
        ctl.publish(Direction::Positive, 5, 500);
        let mut gen = StepPulseGenerator::new(&ctl, PulseCounter::default());

        // First pulse just before the counter wraps.
        let now = u32::MAX - 99;
        assert!(gen.tick(now).unwrap());
        assert_eq!(ctl.position().value(), 1);

        // After the wrap the interval restarts from the first wrapped tick.
        let wrapped = now.wrapping_add(200);
        assert_eq!(wrapped, 100);
        assert!(!gen.tick(wrapped).unwrap());
        assert!(!gen.tick(wrapped + 100).unwrap());
        assert_eq!(ctl.position().value(), 1);
    }

    #[test]
    fn test_emergency_stop_halts_next_tick() {
        let ctl = controller();
        ctl.publish(Direction::Positive, 1000, 500);
        let mut gen = StepPulseGenerator::new(&ctl, PulseCounter::default());

        let mut now = 0;
        while ctl.position().value() < 10 {
            gen.tick(now).unwrap();
            now += TICK_US;
        }
        ctl.emergency_stop();
        for _ in 0..10_000 {
            now += TICK_US;
            assert!(!gen.tick(now).unwrap());
        }
        assert_eq!(ctl.position().value(), 10);
        assert_eq!(ctl.state(), MotionState::Idle);
    }

    #[test]
    fn test_no_ramp_when_start_delay_below_target() {
        let ctl = controller();
        ctl.publish(Direction::Positive, 4, 3000);
        let mut gen = StepPulseGenerator::new(&ctl, PulseCounter::default());

        gen.tick(0).unwrap();
        let snap = ctl.snapshot();
        assert_eq!(snap.state, MotionState::Steady);
        assert_eq!(snap.profile.current_delay, 3000);
    }
}
