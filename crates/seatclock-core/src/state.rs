//! The game state aggregate and its invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ClockConfig, Player, PlayerId, PlayerStatus};

/// Everything needed to render the table and resume a game.
///
/// This is also the unit of undo: the history stores whole copies of
/// it, and it is what gets written to the store after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Seats in table order.
    pub players: Vec<Player>,
    /// Seat whose clock runs while `running` is set. Always a valid
    /// index, even when that seat is not eligible.
    pub current_player_index: usize,
    pub running: bool,
}

/// A broken [`GameState`] invariant, reported by
/// [`GameState::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("game has no seats")]
    NoSeats,

    #[error("current seat {index} is out of range for {len} seats")]
    IndexOutOfRange { index: usize, len: usize },

    /// `Active` implies time on the clock, and no time implies not
    /// `Active`.
    #[error("player {0} is active with no time left")]
    ActiveWithoutTime(PlayerId),

    #[error("player id {0} appears more than once")]
    DuplicateId(PlayerId),
}

impl GameState {
    /// Builds the opening position for `config`: seats `0..seat_count`,
    /// each with the full allowance, turn at seat 0, clock stopped.
    pub fn initialize(config: &ClockConfig) -> Self {
        let players = (0..config.seat_count)
            .map(|seat| {
                let id = PlayerId(u32::try_from(seat).unwrap_or(u32::MAX));
                Player::new(id, config.seconds_per_seat)
            })
            .collect();
        Self {
            players,
            current_player_index: 0,
            running: false,
        }
    }

    /// The seat whose turn it is.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Current seat position of `id`.
    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn is_seat_eligible(&self, seat: usize) -> bool {
        self.players.get(seat).is_some_and(Player::is_eligible)
    }

    pub fn eligible_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_eligible()).count()
    }

    pub fn has_eligible(&self) -> bool {
        self.players.iter().any(Player::is_eligible)
    }

    /// Returns the first broken invariant, if any.
    ///
    /// Used to vet state restored from storage before trusting it.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.players.is_empty() {
            return Err(InvariantViolation::NoSeats);
        }
        if self.current_player_index >= self.players.len() {
            return Err(InvariantViolation::IndexOutOfRange {
                index: self.current_player_index,
                len: self.players.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.players.len());
        for player in &self.players {
            if !seen.insert(player.id) {
                return Err(InvariantViolation::DuplicateId(player.id));
            }
            if player.status == PlayerStatus::Active && player.time_left == 0 {
                return Err(InvariantViolation::ActiveWithoutTime(player.id));
            }
        }
        Ok(())
    }
}
