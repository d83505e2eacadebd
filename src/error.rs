//! Error types for the leadscrew controller.
//!
//! Provides unified error handling across configuration, pin I/O, motion
//! commands and the text command parser.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all leadscrew operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// GPIO error
    Motor(MotorError),
    /// Motion command error
    Motion(MotionError),
    /// Text command error
    Command(CommandError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Lead screw pitch must be > 0
    InvalidPitch(f32),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u32),
    /// Start delay must be > 0 µs
    InvalidStartDelay(u32),
    /// Acceleration step must be > 0 µs
    InvalidAccelerationStep(u32),
    /// Feed rate must be finite and non-negative
    InvalidFeedRate(f32),
    /// Spindle sample age window must be > 0 ms
    InvalidSampleAge(u32),
    /// Builder was not given a required part
    MissingField(&'static str),
    /// Thread-sync poll interval below the supported minimum
    InvalidSyncInterval {
        /// Requested interval in milliseconds
        requested: u32,
        /// Smallest accepted interval in milliseconds
        minimum: u32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// GPIO errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
}

/// Motion command errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Step rate must be finite and strictly positive
    InvalidRate(f32),
    /// Previous move did not finish within the configured wait budget
    WaitTimeout {
        /// Microseconds spent waiting before giving up
        waited_us: u32,
    },
    /// Operation requires an idle axis
    Busy,
}

/// Text command errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Blank input line
    Empty,
    /// Command word not recognised
    Unknown(heapless::String<16>),
    /// Command needs an argument that was not given
    MissingArgument(&'static str),
    /// Argument could not be parsed as a number
    InvalidArgument(heapless::String<16>),
    /// Feed type was neither `rot` nor `time`
    InvalidFeedMode(heapless::String<16>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidPitch(v) => write!(f, "Invalid pitch: {} mm. Must be > 0", v),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidStartDelay(v) => {
                write!(f, "Invalid start delay: {} us. Must be > 0", v)
            }
            ConfigError::InvalidAccelerationStep(v) => {
                write!(f, "Invalid acceleration step: {} us. Must be > 0", v)
            }
            ConfigError::InvalidFeedRate(v) => {
                write!(f, "Invalid feed rate: {}. Must be finite and >= 0", v)
            }
            ConfigError::InvalidSampleAge(v) => {
                write!(f, "Invalid sample age: {} ms. Must be > 0", v)
            }
            ConfigError::MissingField(name) => write!(f, "{} is required", name),
            ConfigError::InvalidSyncInterval { requested, minimum } => {
                write!(f, "Sync interval {} ms is below the minimum of {} ms", requested, minimum)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidRate(rate) => {
                write!(f, "Invalid step rate {} steps/s. Must be > 0", rate)
            }
            MotionError::WaitTimeout { waited_us } => {
                write!(f, "Previous move still running after {} us", waited_us)
            }
            MotionError::Busy => write!(f, "Axis is moving"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "Empty command"),
            CommandError::Unknown(word) => write!(f, "Unknown command '{}'", word),
            CommandError::MissingArgument(name) => write!(f, "Missing argument: {}", name),
            CommandError::InvalidArgument(arg) => write!(f, "Invalid number '{}'", arg),
            CommandError::InvalidFeedMode(mode) => {
                write!(f, "Invalid feed type '{}'. Use 'rot' or 'time'", mode)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

/// Truncate `s` into a fixed-capacity string, keeping whole characters.
pub(crate) fn truncated<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}
