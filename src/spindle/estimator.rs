//! Spindle speed from rotation-marker timestamps.
//!
//! The edge handler appends into a three-slot ring; the command loop takes
//! a snapshot under a critical section and derives revolutions per minute
//! from the samples that are still fresh.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::units::Rpm;
use crate::config::SpindleConfig;

/// Number of edge timestamps kept.
pub const SAMPLE_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
struct SampleRing {
    stamps: [Option<u32>; SAMPLE_SLOTS],
    next: usize,
}

impl SampleRing {
    const fn new() -> Self {
        Self {
            stamps: [None; SAMPLE_SLOTS],
            next: 0,
        }
    }

    fn push(&mut self, now_ms: u32) {
        self.stamps[self.next] = Some(now_ms);
        self.next = (self.next + 1) % SAMPLE_SLOTS;
    }
}

/// Rotation-speed estimator fed by spindle sensor edges.
///
/// Can live in a `static`; both `on_edge` and `calculate_rpm` take `&self`.
pub struct RpmEstimator {
    ring: Mutex<RefCell<SampleRing>>,
    max_age_ms: u32,
}

impl RpmEstimator {
    /// Create an empty estimator that ignores samples older than `max_age_ms`.
    pub const fn new(max_age_ms: u32) -> Self {
        Self {
            ring: Mutex::new(RefCell::new(SampleRing::new())),
            max_age_ms,
        }
    }

    /// Create an estimator from the spindle section.
    pub fn from_config(config: &SpindleConfig) -> Self {
        Self::new(config.sample_max_age_ms)
    }

    /// Staleness window in milliseconds.
    #[inline]
    pub fn max_age_ms(&self) -> u32 {
        self.max_age_ms
    }

    /// Record a rotation marker seen at `now_ms`. Overwrites the oldest slot.
    pub fn on_edge(&self, now_ms: u32) {
        critical_section::with(|cs| self.ring.borrow_ref_mut(cs).push(now_ms));
    }

    /// Copy of all slots, taken atomically with respect to `on_edge`.
    pub fn snapshot(&self) -> [Option<u32>; SAMPLE_SLOTS] {
        critical_section::with(|cs| self.ring.borrow_ref(cs).stamps)
    }

    /// Forget every sample.
    pub fn clear(&self) {
        critical_section::with(|cs| *self.ring.borrow_ref_mut(cs) = SampleRing::new());
    }

    /// Spindle speed at `now_ms`, or zero without two fresh samples.
    pub fn calculate_rpm(&self, now_ms: u32) -> Rpm {
        rpm_from_samples(&self.snapshot(), now_ms, self.max_age_ms)
    }
}

impl core::fmt::Debug for RpmEstimator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RpmEstimator")
            .field("max_age_ms", &self.max_age_ms)
            .finish_non_exhaustive()
    }
}

/// Revolutions per minute spanned by the samples within `max_age_ms` of `now_ms`.
///
/// Ages are signed wrapping differences: a millisecond counter rolling over
/// between samples does not disturb the result, and an edge stamped just
/// after `now_ms` counts as fresh.
pub fn rpm_from_samples(stamps: &[Option<u32>], now_ms: u32, max_age_ms: u32) -> Rpm {
    let mut valid = 0u32;
    let mut newest_age = i32::MAX;
    let mut oldest_age = i32::MIN;

    for &ts in stamps.iter().flatten() {
        let age = now_ms.wrapping_sub(ts) as i32;
        if age.unsigned_abs() < max_age_ms {
            valid += 1;
            newest_age = newest_age.min(age);
            oldest_age = oldest_age.max(age);
        }
    }

    if valid < 2 {
        return Rpm(0.0);
    }

    let elapsed_ms = (oldest_age as i64 - newest_age as i64) as u64;
    if elapsed_ms == 0 {
        return Rpm(0.0);
    }

    let revolutions = (valid - 1) as f32;
    let elapsed_s = elapsed_ms as f32 / 1000.0;
    Rpm(revolutions / elapsed_s * 60.0)
}
