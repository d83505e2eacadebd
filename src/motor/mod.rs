//! Motor module for leadscrew.
//!
//! Provides the command-context interface to the axis and position tracking.

mod builder;
mod command;
mod position;

pub use builder::MotionCommandBuilder;
pub use command::MotionCommand;
pub use position::AxisPosition;
