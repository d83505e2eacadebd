//! Unit tests for configuration validation.

use leadscrew::config::{parse_config, validate_config, LatheConfig, MIN_SYNC_INTERVAL_MS};
use leadscrew::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[leadscrew]
pitch_mm = 2.0
steps_per_revolution = 400

[profile]
start_delay_us = 1200
acceleration_step_us = 20

[feed]
mode = "rot"
mm_per_rev = 1.25
"#;

    let config: LatheConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for zero steps per revolution.
#[test]
fn test_zero_steps_per_revolution() {
    let result = parse_config("[leadscrew]\nsteps_per_revolution = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
    ));
}

/// Test validation fails for a zero start delay.
#[test]
fn test_zero_start_delay() {
    let result = parse_config("[profile]\nstart_delay_us = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidStartDelay(0)))
    ));
}

/// Test validation fails for a negative feed rate.
#[test]
fn test_negative_feed_rate() {
    let result = parse_config("[feed]\nmm_per_min = -10.0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidFeedRate(_)))
    ));
}

/// Test validation fails for a sync interval below the minimum.
#[test]
fn test_sync_interval_too_short() {
    let result = parse_config("[spindle]\nsync_interval_ms = 5\n");
    assert_eq!(
        result.unwrap_err(),
        Error::Config(ConfigError::InvalidSyncInterval {
            requested: 5,
            minimum: MIN_SYNC_INTERVAL_MS,
        })
    );
}

/// Test validation fails for an empty sample window.
#[test]
fn test_zero_sample_age() {
    let mut config = LatheConfig::default();
    config.spindle.sample_max_age_ms = 0;
    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSampleAge(0)))
    );
}

/// Test that the default configuration is valid.
#[test]
fn test_default_config_is_valid() {
    let config = LatheConfig::default();
    assert!(validate_config(&config).is_ok());
}
