//! Motion command interface.
//!
//! The single entry point that programs a move into the pulse generator.
//! At most one move is in flight: `step` waits for the previous move to
//! finish instead of queuing.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Steps, StepsPerSec};
use crate::error::{MotionError, MotorError, Result};
use crate::motion::{Direction, MotionController};

/// Command-context handle to one axis.
///
/// Generic over:
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider used for the settle time and the idle wait
pub struct MotionCommand<'a, DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    controller: &'a MotionController,

    /// DIR pin (high = positive, or inverted).
    dir_pin: DIR,

    delay: DELAY,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Hold time between a direction write and the move publish (µs).
    settle_us: u32,

    /// Idle-wait budget; `None` waits forever.
    max_wait_us: Option<u32>,
}

impl<'a, DIR, DELAY> MotionCommand<'a, DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    pub(crate) fn new(
        controller: &'a MotionController,
        dir_pin: DIR,
        delay: DELAY,
        invert_direction: bool,
        settle_us: u32,
        max_wait_us: Option<u32>,
    ) -> Self {
        Self {
            controller,
            dir_pin,
            delay,
            current_direction: None,
            invert_direction,
            settle_us,
            max_wait_us,
        }
    }

    /// The shared controller.
    #[inline]
    pub fn controller(&self) -> &'a MotionController {
        self.controller
    }

    /// Whether a move is in flight.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.controller.is_moving()
    }

    /// Current axis position in steps.
    #[inline]
    pub fn position(&self) -> Steps {
        self.controller.position()
    }

    /// Change the idle-wait budget.
    pub fn set_max_wait(&mut self, max_wait_us: Option<u32>) {
        self.max_wait_us = max_wait_us;
    }

    /// Program a move of `steps` (sign gives direction) at `rate`.
    ///
    /// Blocks until the previous move has finished, then drives the
    /// direction output, waits the settle time and publishes the move.
    /// Must not be called from the tick context.
    ///
    /// # Errors
    ///
    /// - `MotionError::InvalidRate` if `rate` is zero, negative or not finite
    /// - `MotionError::WaitTimeout` if the previous move outlives the wait budget
    /// - `MotorError::PinError` if the direction pin fails
    pub fn step(&mut self, steps: i32, rate: StepsPerSec) -> Result<()> {
        if !rate.is_valid() {
            warn!("rejected move of {} steps: invalid rate {}", steps, rate.value());
            return Err(MotionError::InvalidRate(rate.value()).into());
        }

        self.wait_idle()?;

        if steps == 0 {
            return Ok(());
        }

        let direction = Direction::from_steps(steps as i64);
        self.set_direction(direction)?;
        if self.settle_us > 0 {
            self.delay.delay_us(self.settle_us);
        }

        let target_delay = rate.to_delay_us();
        self.controller
            .publish(direction, steps.unsigned_abs(), target_delay);
        debug!("move {} steps, target delay {} us", steps, target_delay);
        Ok(())
    }

    /// Busy-wait until no move is in flight.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::WaitTimeout` once the wait budget is spent.
    pub fn wait_idle(&mut self) -> Result<()> {
        let mut waited_us: u32 = 0;
        while self.controller.is_moving() {
            if let Some(limit) = self.max_wait_us {
                if waited_us >= limit {
                    warn!("previous move still running after {} us", waited_us);
                    return Err(MotionError::WaitTimeout { waited_us }.into());
                }
            }
            self.delay.delay_us(1);
            waited_us = waited_us.saturating_add(1);
        }
        Ok(())
    }

    /// Abandon the move in flight.
    pub fn emergency_stop(&self) {
        if self.controller.is_moving() {
            info!("emergency stop at {} steps", self.controller.position().value());
        }
        self.controller.emergency_stop();
    }

    /// Reset the axis position to zero. Fails with `Busy` while moving.
    pub fn zero(&self) -> Result<()> {
        self.controller.zero()
    }

    /// Release the DIR pin and delay provider.
    pub fn release(self) -> (DIR, DELAY) {
        (self.dir_pin, self.delay)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Positive => !self.invert_direction,
            Direction::Negative => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    use super::*;
    use crate::error::Error;
    use crate::motion::{MotionState, RampSettings};

    fn controller() -> MotionController {
        MotionController::new(RampSettings::default())
    }

    #[test]
    fn test_rejects_invalid_rates_without_touching_pins() {
        let ctl = controller();
        let pin = PinMock::new(&[]);
        let mut cmd = MotionCommand::new(&ctl, pin, NoopDelay::new(), false, 10, None);

        for rate in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                cmd.step(100, StepsPerSec(rate)),
                Err(Error::Motion(MotionError::InvalidRate(_)))
            ));
        }
        assert!(!ctl.is_moving());

        let (mut pin, _) = cmd.release();
        pin.done();
    }

    #[test]
    fn test_direction_written_once_per_change() {
        let ctl = controller();
        let pin = PinMock::new(&[
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
        ]);
        let mut cmd = MotionCommand::new(&ctl, pin, NoopDelay::new(), true, 10, None);

        cmd.step(5, StepsPerSec(1000.0)).unwrap();
        assert_eq!(ctl.snapshot().profile.target_delay, 1000);
        ctl.emergency_stop();

        cmd.step(7, StepsPerSec(1000.0)).unwrap();
        ctl.emergency_stop();

        cmd.step(-3, StepsPerSec(2000.0)).unwrap();
        let snap = ctl.snapshot();
        assert_eq!(snap.direction, Direction::Negative);
        assert_eq!(snap.remaining_steps, 3);
        assert_eq!(snap.profile.target_delay, 500);
        assert_eq!(snap.state, MotionState::Accelerating);

        let (mut pin, _) = cmd.release();
        pin.done();
    }

    #[test]
    fn test_zero_steps_publishes_nothing() {
        let ctl = controller();
        let pin = PinMock::new(&[]);
        let mut cmd = MotionCommand::new(&ctl, pin, NoopDelay::new(), false, 10, None);

        cmd.step(0, StepsPerSec(1000.0)).unwrap();
        assert!(!ctl.is_moving());

        let (mut pin, _) = cmd.release();
        pin.done();
    }

    #[test]
    fn test_wait_times_out_on_stuck_move() {
        let ctl = controller();
        ctl.publish(Direction::Positive, 100, 500);

        let pin = PinMock::new(&[]);
        let mut cmd = MotionCommand::new(&ctl, pin, NoopDelay::new(), false, 10, Some(50));
        assert_eq!(
            cmd.step(10, StepsPerSec(1000.0)),
            Err(Error::Motion(MotionError::WaitTimeout { waited_us: 50 }))
        );
        assert_eq!(ctl.remaining_steps(), 100);

        cmd.set_max_wait(Some(200));
        assert_eq!(
            cmd.wait_idle(),
            Err(Error::Motion(MotionError::WaitTimeout { waited_us: 200 }))
        );

        let (mut pin, _) = cmd.release();
        pin.done();
    }

    #[test]
    fn test_emergency_stop_then_new_move() {
        let ctl = controller();
        let pin = PinMock::new(&[PinTransaction::set(State::High)]);
        let mut cmd = MotionCommand::new(&ctl, pin, NoopDelay::new(), false, 0, Some(0));

        cmd.step(100, StepsPerSec(1000.0)).unwrap();
        assert!(cmd.zero().is_err());
        cmd.emergency_stop();
        assert!(cmd.zero().is_ok());
        cmd.step(20, StepsPerSec(1000.0)).unwrap();
        assert_eq!(ctl.remaining_steps(), 20);

        let (mut pin, _) = cmd.release();
        pin.done();
    }
}
