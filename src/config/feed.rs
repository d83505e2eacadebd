//! Feed specifications for cutting and travel moves.

use serde::Deserialize;

use super::units::{MmPerMin, MmPerRev, MmPerSec, Rpm};

/// How a feed rate is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// mm per spindle revolution.
    #[serde(alias = "rot")]
    Rotation,
    /// mm per minute.
    #[default]
    Time,
}

/// Feed quantity plus the mode that selects which field applies.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FeedSpec {
    /// Which of the two rates drives the move.
    #[serde(default)]
    pub mode: FeedMode,

    /// Rotation-based feed.
    #[serde(default, rename = "mm_per_rev")]
    pub per_rev: MmPerRev,

    /// Time-based feed.
    #[serde(default, rename = "mm_per_min")]
    pub per_min: MmPerMin,
}

impl FeedSpec {
    /// Create a rotation-based feed.
    pub const fn per_revolution(feed: MmPerRev) -> Self {
        Self {
            mode: FeedMode::Rotation,
            per_rev: feed,
            per_min: MmPerMin(0.0),
        }
    }

    /// Create a time-based feed.
    pub const fn per_minute(feed: MmPerMin) -> Self {
        Self {
            mode: FeedMode::Time,
            per_rev: MmPerRev(0.0),
            per_min: feed,
        }
    }

    /// Axial velocity for this feed at the given spindle speed.
    pub fn velocity(&self, rpm: Rpm) -> MmPerSec {
        match self.mode {
            FeedMode::Time => self.per_min.per_sec(),
            FeedMode::Rotation => self.per_rev.at(rpm),
        }
    }

    /// Default cutting feed: 1.92 mm/rev, 120 mm/min, time based.
    pub fn default_cut() -> Self {
        Self {
            mode: FeedMode::Time,
            per_rev: MmPerRev(3.0 * 32.0 / 50.0),
            per_min: MmPerMin(120.0),
        }
    }

    /// Default travel feed: 500 mm/min, time based.
    pub fn default_travel() -> Self {
        Self {
            mode: FeedMode::Time,
            per_rev: MmPerRev(1.0),
            per_min: MmPerMin(500.0),
        }
    }
}
