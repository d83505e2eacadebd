//! Motion module for leadscrew.
//!
//! Provides the shared motion state and the tick-driven step pulse generator.

mod controller;
mod generator;
mod profile;
mod state;

pub use controller::{MotionController, MotionSnapshot};
pub use generator::StepPulseGenerator;
pub use profile::{Direction, RampSettings, VelocityProfile};
pub use state::MotionState;
