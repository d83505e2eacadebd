//! Builder pattern for MotionCommand.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::LatheConfig;
use crate::error::{ConfigError, Result};
use crate::motion::MotionController;

use super::command::MotionCommand;

/// Default direction settle time (µs).
const DEFAULT_SETTLE_US: u32 = 10;

/// Builder for creating MotionCommand instances.
pub struct MotionCommandBuilder<DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    invert_direction: bool,
    settle_us: u32,
    max_wait_us: Option<u32>,
}

impl<DIR, DELAY> Default for MotionCommandBuilder<DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<DIR, DELAY> MotionCommandBuilder<DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            dir_pin: None,
            delay: None,
            invert_direction: false,
            settle_us: DEFAULT_SETTLE_US,
            max_wait_us: None,
        }
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set the direction settle time in microseconds.
    pub fn settle_us(mut self, us: u32) -> Self {
        self.settle_us = us;
        self
    }

    /// Bound the wait for the previous move. `None` waits forever.
    pub fn max_wait_us(mut self, us: Option<u32>) -> Self {
        self.max_wait_us = us;
        self
    }

    /// Take inversion, settle time and wait budget from a loaded config.
    pub fn from_config(mut self, config: &LatheConfig) -> Self {
        self.invert_direction = config.leadscrew.invert_direction;
        self.settle_us = config.profile.direction_settle_us;
        self.max_wait_us = config.profile.max_wait_us;
        self
    }

    /// Build the command interface for `controller`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the pin or delay was not set.
    pub fn build(self, controller: &MotionController) -> Result<MotionCommand<'_, DIR, DELAY>> {
        let dir_pin = self.dir_pin.ok_or(ConfigError::MissingField("dir_pin"))?;
        let delay = self.delay.ok_or(ConfigError::MissingField("delay"))?;

        Ok(MotionCommand::new(
            controller,
            dir_pin,
            delay,
            self.invert_direction,
            self.settle_us,
            self.max_wait_us,
        ))
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_missing_pin() {
        let ctl = MotionController::default();
        let result = MotionCommandBuilder::<PinMock, NoopDelay>::new()
            .delay(NoopDelay::new())
            .build(&ctl);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("dir_pin")))
        ));
    }

    #[test]
    fn test_build_from_config() {
        let ctl = MotionController::default();
        let mut config = LatheConfig::default();
        config.profile.max_wait_us = Some(0);

        let mut cmd = MotionCommandBuilder::new()
            .from_config(&config)
            .dir_pin(PinMock::new(&[]))
            .delay(NoopDelay::new())
            .build(&ctl)
            .unwrap();

        assert!(cmd.wait_idle().is_ok());
        let (mut pin, _) = cmd.release();
        pin.done();
    }
}
