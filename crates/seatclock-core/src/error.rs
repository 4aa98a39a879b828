//! Error types for configuration intake.
//!
//! The state machine itself never fails: rejected operations are
//! no-ops. Errors only exist at the edge, where a configuration or a
//! typed-in clock value is checked before a game is built from it.

/// Errors produced while validating a [`ClockConfig`](crate::ClockConfig)
/// or parsing clock input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A table needs at least one seat.
    #[error("seat count must be at least 1")]
    NoSeats,

    #[error("seat count {count} exceeds the maximum of {max}")]
    TooManySeats { count: usize, max: usize },

    /// Every seat must start with some time on its clock.
    #[error("seconds per seat must be at least 1")]
    NoTime,

    /// A seat count that isn't a whole number.
    #[error("invalid seat count {0:?}: expected a whole number")]
    InvalidSeatCount(String),

    /// Input was not `s`, `m:ss`, or `h:mm:ss`.
    #[error("invalid clock value {0:?}: expected s, m:ss or h:mm:ss")]
    InvalidClockInput(String),
}
