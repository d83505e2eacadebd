//! System configuration - root configuration structure.

use serde::Deserialize;

use super::feed::FeedSpec;
use super::leadscrew::{LeadscrewConfig, LeadscrewSpec};
use super::profile::ProfileConfig;
use super::spindle::SpindleConfig;

/// Root configuration structure from TOML.
///
/// Every section is optional; missing values fall back to the stock machine.
#[derive(Debug, Clone, Deserialize)]
pub struct LatheConfig {
    /// Lead screw geometry.
    #[serde(default)]
    pub leadscrew: LeadscrewConfig,

    /// Velocity profile and command timing.
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Cutting feed (`feed*` commands).
    #[serde(default = "FeedSpec::default_cut")]
    pub feed: FeedSpec,

    /// Travel feed (`travel*` commands).
    #[serde(default = "FeedSpec::default_travel")]
    pub travel: FeedSpec,

    /// Spindle sensing and thread sync.
    #[serde(default)]
    pub spindle: SpindleConfig,
}

impl LatheConfig {
    /// Derived lead screw parameters.
    pub fn leadscrew_spec(&self) -> LeadscrewSpec {
        LeadscrewSpec::from_config(&self.leadscrew)
    }
}

impl Default for LatheConfig {
    fn default() -> Self {
        Self {
            leadscrew: LeadscrewConfig::default(),
            profile: ProfileConfig::default(),
            feed: FeedSpec::default_cut(),
            travel: FeedSpec::default_travel(),
            spindle: SpindleConfig::default(),
        }
    }
}
