//! Configuration module for the leadscrew controller.
//!
//! Provides types for loading and validating lead screw, profile, feed and
//! spindle settings from TOML files (with `std` feature) or pre-parsed data.

mod feed;
mod leadscrew;
#[cfg(feature = "std")]
mod loader;
mod profile;
mod spindle;
mod system;
pub mod units;
mod validation;

pub use feed::{FeedMode, FeedSpec};
pub use leadscrew::{LeadscrewConfig, LeadscrewSpec};
pub use profile::ProfileConfig;
pub use spindle::{SpindleConfig, MIN_SYNC_INTERVAL_MS};
pub use system::LatheConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Millimeters, MmPerMin, MmPerRev, MmPerSec, Rpm, Steps, StepsPerSec};
