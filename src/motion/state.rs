//! Motion state machine states.

/// Phase of the move currently owned by the pulse generator.
///
/// `Idle` is both the initial state and the state between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MotionState {
    /// No move in flight.
    #[default]
    Idle = 0,
    /// Pulse interval shrinking toward the target delay.
    Accelerating = 1,
    /// Pulse interval pinned to the target delay.
    Steady = 2,
    /// Pulse interval growing back toward the start delay.
    Decelerating = 3,
}

impl MotionState {
    /// Decode the stored representation. Unknown values read as `Idle`.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => MotionState::Accelerating,
            2 => MotionState::Steady,
            3 => MotionState::Decelerating,
            _ => MotionState::Idle,
        }
    }

    /// Stored representation.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// State name for display/debugging.
    pub const fn name(self) -> &'static str {
        match self {
            MotionState::Idle => "Idle",
            MotionState::Accelerating => "Accelerating",
            MotionState::Steady => "Steady",
            MotionState::Decelerating => "Decelerating",
        }
    }
}
