//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::feed::FeedSpec;
use super::spindle::MIN_SYNC_INTERVAL_MS;
use super::LatheConfig;

/// Validate a lathe configuration.
///
/// Checks:
/// - Lead screw pitch and steps per revolution are positive
/// - Profile start delay and acceleration step are positive
/// - Feed rates are finite and non-negative
/// - Spindle sample window and sync interval are usable
pub fn validate_config(config: &LatheConfig) -> Result<()> {
    let screw = &config.leadscrew;
    if !(screw.pitch.0.is_finite() && screw.pitch.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidPitch(screw.pitch.0)));
    }
    if screw.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            screw.steps_per_revolution,
        )));
    }

    let profile = &config.profile;
    if profile.start_delay_us == 0 {
        return Err(Error::Config(ConfigError::InvalidStartDelay(profile.start_delay_us)));
    }
    if profile.acceleration_step_us == 0 {
        return Err(Error::Config(ConfigError::InvalidAccelerationStep(
            profile.acceleration_step_us,
        )));
    }

    validate_feed(&config.feed)?;
    validate_feed(&config.travel)?;

    let spindle = &config.spindle;
    if !(spindle.initial_rpm.0.is_finite() && spindle.initial_rpm.0 >= 0.0) {
        return Err(Error::Config(ConfigError::InvalidFeedRate(spindle.initial_rpm.0)));
    }
    if spindle.sample_max_age_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidSampleAge(spindle.sample_max_age_ms)));
    }
    if spindle.sync_interval_ms < MIN_SYNC_INTERVAL_MS {
        return Err(Error::Config(ConfigError::InvalidSyncInterval {
            requested: spindle.sync_interval_ms,
            minimum: MIN_SYNC_INTERVAL_MS,
        }));
    }

    Ok(())
}

fn validate_feed(feed: &FeedSpec) -> Result<()> {
    for rate in [feed.per_rev.0, feed.per_min.0] {
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(Error::Config(ConfigError::InvalidFeedRate(rate)));
        }
    }
    Ok(())
}
