//! # leadscrew
//!
//! Electronic lead screw for a lathe carriage, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Trapezoidal step generation**: a timer-driven tick ramps the pulse
//!   interval from a start delay to the move's target and back
//! - **Spindle-synchronized feed**: threading mode re-targets a running move
//!   from the measured spindle speed without re-issuing it
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR, `DelayNs` for timing
//! - **no_std compatible**: Core library works without standard library
//! - **Position tracking**: Absolute position tracked at all times
//!
//! ## Contexts
//!
//! Two execution contexts share one [`MotionController`] and one
//! [`RpmEstimator`], both of which can be `static`:
//!
//! - the timer interrupt calls [`StepPulseGenerator::tick`], the spindle
//!   sensor interrupt calls [`RpmEstimator::on_edge`];
//! - the command loop owns a [`Lathe`] (or a bare [`MotionCommand`]) and
//!   calls [`Lathe::poll`] between commands.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leadscrew::{
//!     Lathe, MotionCommandBuilder, MotionController, RampSettings, RpmEstimator, StepPulseGenerator,
//! };
//!
//! static MOTION: MotionController = MotionController::new(RampSettings {
//!     start_delay: 1500,
//!     acceleration_step: 10,
//!     accel_update_interval: 2000,
//! });
//! static SPINDLE: RpmEstimator = RpmEstimator::new(6000);
//!
//! // Timer interrupt (tens of kHz)
//! generator.tick(micros())?;
//!
//! // Hall sensor interrupt
//! SPINDLE.on_edge(millis());
//!
//! // Command loop
//! let motion = MotionCommandBuilder::new()
//!     .from_config(&config)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .build(&MOTION)?;
//! let mut lathe = Lathe::new(&config, motion, &SPINDLE);
//! lathe.execute_line("feedrel 10")?;
//! lathe.poll(millis());
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// Core modules
pub mod command;
pub mod config;
pub mod error;
pub mod lathe;
pub mod motion;
pub mod motor;
pub mod planner;
pub mod spindle;

// Re-exports for ergonomic API
pub use command::Command;
pub use config::{validate_config, FeedMode, FeedSpec, LatheConfig, LeadscrewSpec};
pub use error::{Error, Result};
pub use lathe::{Lathe, Response};
pub use motion::{Direction, MotionController, MotionState, RampSettings, StepPulseGenerator};
pub use motor::{AxisPosition, MotionCommand, MotionCommandBuilder};
pub use planner::{MovePlanner, MoveRequest};
pub use spindle::{RpmEstimator, SyncUpdate, ThreadSync};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Millimeters, MmPerMin, MmPerRev, Rpm, Steps, StepsPerSec};
