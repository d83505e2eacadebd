//! Unit tests for TOML configuration parsing.

use leadscrew::config::{load_config, FeedMode, LatheConfig};
use leadscrew::error::{ConfigError, Error};

/// Test parsing a lead screw section.
#[test]
fn test_parse_leadscrew_section() {
    let toml_str = r#"
[leadscrew]
axis = "X"
pitch_mm = 1.5
steps_per_revolution = 3200
invert_direction = true
"#;

    let config: LatheConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.leadscrew.axis.as_str(), "X");
    assert_eq!(config.leadscrew.pitch.0, 1.5);
    assert_eq!(config.leadscrew.steps_per_revolution, 3200);
    assert!(config.leadscrew.invert_direction);

    let spec = config.leadscrew_spec();
    assert!((spec.steps_per_mm - 2133.333).abs() < 0.01);
}

/// Test that the feed mode accepts both spellings.
#[test]
fn test_parse_feed_modes() {
    for (mode, expected) in [
        ("rot", FeedMode::Rotation),
        ("rotation", FeedMode::Rotation),
        ("time", FeedMode::Time),
    ] {
        let toml_str = format!("[feed]\nmode = \"{mode}\"\nmm_per_rev = 0.5\n");
        let config: LatheConfig = toml::from_str(&toml_str).expect("Failed to parse TOML");
        assert_eq!(config.feed.mode, expected);
        assert_eq!(config.feed.per_rev.0, 0.5);
    }
}

/// Test that an unknown feed mode is a parse error.
#[test]
fn test_unknown_feed_mode_rejected() {
    let result: Result<LatheConfig, _> = toml::from_str("[feed]\nmode = \"sideways\"\n");
    assert!(result.is_err(), "Should reject unknown feed mode");
}

/// Test that missing sections fall back to the stock machine.
#[test]
fn test_missing_sections_use_defaults() {
    let config: LatheConfig = toml::from_str("[spindle]\ninitial_rpm = 90.0\n").unwrap();
    assert_eq!(config.spindle.initial_rpm.0, 90.0);
    assert_eq!(config.spindle.sync_interval_ms, 500);
    assert_eq!(config.profile.direction_settle_us, 10);
    assert_eq!(config.profile.max_wait_us, None);
    assert!((config.feed.per_min.0 - 120.0).abs() < 1e-6);
    assert_eq!(config.travel.mode, FeedMode::Time);
}

/// Test loading a configuration from disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("leadscrew-{}.toml", std::process::id()));
    std::fs::write(&path, "[profile]\nstart_delay_us = 1800\n").unwrap();

    let config = load_config(&path).expect("Failed to load config");
    std::fs::remove_file(&path).ok();

    assert_eq!(config.profile.start_delay_us, 1800);
}

/// Test that a missing file is reported as an I/O error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/leadscrew.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
