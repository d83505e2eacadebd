//! Spindle module for leadscrew.
//!
//! Speed estimation from sensor edges and the feed-to-spindle sync loop.

mod estimator;
mod sync;

pub use estimator::{rpm_from_samples, RpmEstimator, SAMPLE_SLOTS};
pub use sync::{SyncUpdate, ThreadSync};
