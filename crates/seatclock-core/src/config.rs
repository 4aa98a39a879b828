//! Clock configuration and table policy.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

// ---------------------------------------------------------------------------
// ClockConfig
// ---------------------------------------------------------------------------

/// The settings a game is created from. Fixed for the game's lifetime;
/// changing them means starting a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockConfig {
    /// Number of seats at the table.
    pub seat_count: usize,

    /// Starting time for every seat, in seconds.
    pub seconds_per_seat: u32,

    /// Seconds added to a seat's clock each time it passes the turn.
    /// 0 disables the increment.
    pub increment_seconds: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            seat_count: 2,
            seconds_per_seat: 300,
            increment_seconds: 0,
        }
    }
}

impl ClockConfig {
    /// Largest table the clock accepts.
    pub const MAX_SEATS: usize = 32;

    pub fn new(seat_count: usize, seconds_per_seat: u32, increment_seconds: u32) -> Self {
        Self {
            seat_count,
            seconds_per_seat,
            increment_seconds,
        }
    }

    /// Checks the ranges the state machine relies on.
    ///
    /// # Errors
    /// - [`ConfigError::NoSeats`] when `seat_count` is 0.
    /// - [`ConfigError::TooManySeats`] above [`Self::MAX_SEATS`].
    /// - [`ConfigError::NoTime`] when `seconds_per_seat` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seat_count == 0 {
            return Err(ConfigError::NoSeats);
        }
        if self.seat_count > Self::MAX_SEATS {
            return Err(ConfigError::TooManySeats {
                count: self.seat_count,
                max: Self::MAX_SEATS,
            });
        }
        if self.seconds_per_seat == 0 {
            return Err(ConfigError::NoTime);
        }
        Ok(())
    }

    /// Validates and returns `self`, for builder-style call sites.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// ClockPolicy
// ---------------------------------------------------------------------------

/// When eliminating the seat whose turn it is should pause the clock
/// and hand the turn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EliminationPause {
    /// Only while the clock is running. Eliminating the current seat of
    /// a paused game leaves the turn where it is.
    #[default]
    WhenRunning,
    /// Always pause and move the turn off the eliminated seat.
    Always,
}

/// House rules for the edges where tables disagree.
///
/// The defaults match the common convention; each switch can be flipped
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockPolicy {
    /// Keep eliminated players out (at 0 seconds) when a new game is
    /// started with the same table.
    pub preserve_eliminated_on_new_game: bool,

    /// See [`EliminationPause`].
    pub elimination_pause: EliminationPause,

    /// Pause the clock when passing the turn finds no eligible seat.
    pub pause_when_advance_exhausted: bool,
}

impl Default for ClockPolicy {
    fn default() -> Self {
        Self {
            preserve_eliminated_on_new_game: true,
            elimination_pause: EliminationPause::WhenRunning,
            pause_when_advance_exhausted: true,
        }
    }
}
