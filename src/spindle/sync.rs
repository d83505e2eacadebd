//! Thread-sync loop: locks axial feed to live spindle speed.
//!
//! Each poll re-derives the pulse interval from the measured spindle speed
//! and writes it straight into the move in flight. Step count and
//! direction of that move are never touched.

use crate::config::units::{MmPerRev, Rpm, StepsPerSec};
use crate::config::{LeadscrewSpec, SpindleConfig, MIN_SYNC_INTERVAL_MS};
use crate::motion::MotionController;

use super::estimator::RpmEstimator;

/// Outcome of one thread-sync cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncUpdate {
    /// Measured spindle speed.
    pub rpm: Rpm,
    /// Pulse rate derived from it.
    pub steps_per_sec: StepsPerSec,
    /// Whether the rate reached the generator.
    pub applied: bool,
}

/// Threading-mode state polled from the command loop.
#[derive(Debug, Clone)]
pub struct ThreadSync {
    enabled: bool,
    interval_ms: u32,
    last_poll_ms: Option<u32>,
}

impl ThreadSync {
    /// Disabled sync polling every `interval_ms` (raised to the minimum).
    pub fn new(interval_ms: u32) -> Self {
        Self {
            enabled: false,
            interval_ms: interval_ms.max(MIN_SYNC_INTERVAL_MS),
            last_poll_ms: None,
        }
    }

    /// Disabled sync with the configured interval.
    pub fn from_config(config: &SpindleConfig) -> Self {
        Self::new(config.sync_interval_ms)
    }

    /// Whether threading mode is on.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn threading mode on or off. Turning it on makes the next poll run.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.last_poll_ms = None;
        }
        self.enabled = enabled;
        info!("threading mode {}", enabled);
    }

    /// Flip threading mode and return the new setting.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Poll interval in milliseconds.
    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Change the poll interval; values under the minimum are raised to it.
    /// Returns the interval actually used.
    pub fn set_interval(&mut self, interval_ms: u32) -> u32 {
        self.interval_ms = interval_ms.max(MIN_SYNC_INTERVAL_MS);
        self.interval_ms
    }

    /// Run one cycle if threading is on and the interval has elapsed.
    ///
    /// A zero or unusable rate (no spindle signal) leaves the generator's
    /// target untouched, so a running move holds its last synced speed.
    pub fn poll(
        &mut self,
        now_ms: u32,
        feed: MmPerRev,
        estimator: &RpmEstimator,
        controller: &MotionController,
        screw: &LeadscrewSpec,
    ) -> Option<SyncUpdate> {
        if !self.enabled {
            return None;
        }
        if let Some(last) = self.last_poll_ms {
            if now_ms.wrapping_sub(last) < self.interval_ms {
                return None;
            }
        }
        self.last_poll_ms = Some(now_ms);

        let rpm = estimator.calculate_rpm(now_ms);
        let steps_per_sec = screw.velocity_to_rate(feed.at(rpm));

        let applied = if steps_per_sec.is_valid() {
            controller.retarget(steps_per_sec.to_delay_us())
        } else {
            debug!("no spindle signal, holding rate");
            false
        };

        trace!("sync rpm {} -> {} steps/s", rpm.value(), steps_per_sec.value());
        Some(SyncUpdate {
            rpm,
            steps_per_sec,
            applied,
        })
    }
}

impl Default for ThreadSync {
    fn default() -> Self {
        Self::from_config(&SpindleConfig::default())
    }
}
