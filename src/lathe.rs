//! Command-loop facade.
//!
//! `Lathe` ties the text commands to the planner, the feeds, the spindle
//! speed and the motion command interface. It runs entirely in the command
//! context; the pulse generator and the sensor edge handler only share the
//! controller and the estimator with it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::command::{Command, Feed, Positioning};
use crate::config::units::{Millimeters, Rpm, Steps};
use crate::config::{FeedSpec, LatheConfig};
use crate::error::Result;
use crate::motor::MotionCommand;
use crate::planner::MovePlanner;
use crate::spindle::{RpmEstimator, SyncUpdate, ThreadSync};

/// Reply to an executed command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Axis position.
    Position {
        /// Steps from the zero point.
        steps: Steps,
        /// Same position in mm.
        mm: Millimeters,
    },
    /// Spindle speed in use.
    Rpm(Rpm),
    /// Threading mode after a toggle.
    Threading(bool),
    /// Command applied.
    Ack,
}

/// Lathe controller state owned by the command loop.
pub struct Lathe<'a, DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    motion: MotionCommand<'a, DIR, DELAY>,
    spindle: &'a RpmEstimator,
    planner: MovePlanner,
    cut: FeedSpec,
    travel: FeedSpec,
    rpm: Rpm,
    sync: ThreadSync,
}

impl<'a, DIR, DELAY> Lathe<'a, DIR, DELAY>
where
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create the facade from a loaded config.
    pub fn new(
        config: &LatheConfig,
        motion: MotionCommand<'a, DIR, DELAY>,
        spindle: &'a RpmEstimator,
    ) -> Self {
        Self {
            motion,
            spindle,
            planner: MovePlanner::new(config.leadscrew_spec()),
            cut: config.feed,
            travel: config.travel,
            rpm: config.spindle.initial_rpm,
            sync: ThreadSync::from_config(&config.spindle),
        }
    }

    /// Parse and execute one command line.
    pub fn execute_line(&mut self, line: &str) -> Result<Response> {
        self.execute(Command::parse(line)?)
    }

    /// Execute a parsed command.
    ///
    /// Move commands block until the previous move has finished.
    pub fn execute(&mut self, cmd: Command) -> Result<Response> {
        match cmd {
            Command::Position => {
                let axis = self.motion.controller().axis();
                return Ok(Response::Position {
                    steps: axis.steps(),
                    mm: axis.mm(self.planner.screw()),
                });
            }
            Command::Rpm => return Ok(Response::Rpm(self.rpm)),
            Command::Zero => {
                self.motion.zero()?;
                info!("zero point set");
            }
            Command::FeedType(mode) => self.cut.mode = mode,
            Command::Move {
                feed,
                positioning,
                distance,
            } => {
                let spec = match feed {
                    Feed::Cut => &self.cut,
                    Feed::Travel => &self.travel,
                };
                let request = match positioning {
                    Positioning::Relative => self.planner.relative(distance, spec, self.rpm)?,
                    Positioning::Absolute => self.planner.absolute(
                        distance,
                        spec,
                        self.rpm,
                        self.motion.position(),
                    )?,
                };
                self.motion.step(request.steps, request.steps_per_sec)?;
            }
            Command::FeedPerRev(feed) => self.cut.per_rev = feed,
            Command::FeedPerMin(feed) => self.cut.per_min = feed,
            Command::TravelSpeed(feed) => self.travel.per_min = feed,
            Command::SpindleSpeed(rpm) => self.rpm = rpm,
            Command::SyncInterval(ms) => {
                self.sync.set_interval(ms);
            }
            Command::ToggleThreading => return Ok(Response::Threading(self.sync.toggle())),
            Command::Acceleration(us) => self.motion.controller().set_acceleration_step(us),
            Command::MaxDelay(us) => self.motion.controller().set_start_delay(us),
            Command::Stop => self.motion.emergency_stop(),
        }
        Ok(Response::Ack)
    }

    /// Run one thread-sync cycle. Call often from the command loop.
    ///
    /// The measured speed replaces the manual one while threading is on.
    pub fn poll(&mut self, now_ms: u32) -> Option<SyncUpdate> {
        let update = self.sync.poll(
            now_ms,
            self.cut.per_rev,
            self.spindle,
            self.motion.controller(),
            self.planner.screw(),
        )?;
        self.rpm = update.rpm;
        Some(update)
    }

    /// Spindle speed used for rotation feeds.
    #[inline]
    pub fn rpm(&self) -> Rpm {
        self.rpm
    }

    /// Whether threading mode is on.
    #[inline]
    pub fn is_threading(&self) -> bool {
        self.sync.is_enabled()
    }

    /// Cutting feed.
    pub fn cut_feed(&self) -> &FeedSpec {
        &self.cut
    }

    /// Travel feed.
    pub fn travel_feed(&self) -> &FeedSpec {
        &self.travel
    }

    /// Move planner.
    pub fn planner(&self) -> &MovePlanner {
        &self.planner
    }

    /// Motion command interface.
    pub fn motion(&mut self) -> &mut MotionCommand<'a, DIR, DELAY> {
        &mut self.motion
    }

    /// Give back the motion command interface.
    pub fn release(self) -> MotionCommand<'a, DIR, DELAY> {
        self.motion
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal_mock::eh1::delay::NoopDelay;

    use super::*;
    use crate::config::FeedMode;
    use crate::error::{Error, MotionError};
    use crate::motion::MotionController;
    use crate::motor::MotionCommandBuilder;

    struct NoPin;

    impl embedded_hal::digital::ErrorType for NoPin {
        type Error = Infallible;
    }

    impl OutputPin for NoPin {
        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }

        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }
    }

    fn lathe<'a>(
        ctl: &'a MotionController,
        est: &'a RpmEstimator,
    ) -> Lathe<'a, NoPin, NoopDelay> {
        let mut config = LatheConfig::default();
        config.profile.max_wait_us = Some(0);
        let motion = MotionCommandBuilder::new()
            .from_config(&config)
            .dir_pin(NoPin)
            .delay(NoopDelay::new())
            .build(ctl)
            .unwrap();
        Lathe::new(&config, motion, est)
    }

    #[test]
    fn test_feed_settings() {
        let ctl = MotionController::default();
        let est = RpmEstimator::new(6000);
        let mut lathe = lathe(&ctl, &est);

        lathe.execute_line("feedtype rot").unwrap();
        lathe.execute_line("feedraterpm 1.5").unwrap();
        lathe.execute_line("travelspeed 800").unwrap();
        assert_eq!(lathe.cut_feed().mode, FeedMode::Rotation);
        assert_eq!(lathe.cut_feed().per_rev.0, 1.5);
        assert_eq!(lathe.travel_feed().per_min.0, 800.0);
        assert_eq!(lathe.travel_feed().mode, FeedMode::Time);
    }

    #[test]
    fn test_move_publishes_and_busy_rejects() {
        let ctl = MotionController::default();
        let est = RpmEstimator::new(6000);
        let mut lathe = lathe(&ctl, &est);

        // 800 steps per 1.92 mm
        lathe.execute_line("travelrel 1.92").unwrap();
        assert_eq!(ctl.remaining_steps(), 800);

        assert!(matches!(
            lathe.execute_line("feedrel 1"),
            Err(Error::Motion(MotionError::WaitTimeout { .. }))
        ));
        assert!(lathe.execute_line("zero").is_err());

        assert_eq!(lathe.execute_line("stop").unwrap(), Response::Ack);
        assert!(!ctl.is_moving());
    }

    #[test]
    fn test_rotation_feed_needs_spindle() {
        let ctl = MotionController::default();
        let est = RpmEstimator::new(6000);
        let mut lathe = lathe(&ctl, &est);

        lathe.execute_line("feedtype rot").unwrap();
        lathe.execute_line("s 0").unwrap();
        assert!(matches!(
            lathe.execute_line("feedrel 1"),
            Err(Error::Motion(MotionError::InvalidRate(_)))
        ));
        assert!(!ctl.is_moving());
    }

    #[test]
    fn test_threading_poll_updates_rpm() {
        let ctl = MotionController::default();
        let est = RpmEstimator::new(6000);
        let mut lathe = lathe(&ctl, &est);

        assert!(lathe.poll(0).is_none());
        assert_eq!(
            lathe.execute(Command::ToggleThreading).unwrap(),
            Response::Threading(true)
        );

        est.on_edge(0);
        est.on_edge(1000);
        let update = lathe.poll(1000).unwrap();
        assert!((update.rpm.value() - 60.0).abs() < 1e-3);
        assert_eq!(lathe.execute_line("rpm").unwrap(), Response::Rpm(update.rpm));
    }

    #[test]
    fn test_tuning_reaches_controller() {
        let ctl = MotionController::default();
        let est = RpmEstimator::new(6000);
        let mut lathe = lathe(&ctl, &est);

        lathe.execute_line("acc 25").unwrap();
        lathe.execute_line("maxdelay 2500").unwrap();
        let ramp = ctl.ramp();
        assert_eq!(ramp.acceleration_step, 25);
        assert_eq!(ramp.start_delay, 2500);
    }
}
