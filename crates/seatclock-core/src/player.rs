//! Player identity and per-seat clock status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a player for the lifetime of a game.
///
/// Ids are handed out once at initialization (`0..seat_count`) and
/// travel with the player when seats are reordered, so operations that
/// target a specific person take a `PlayerId`, never a seat index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Where a player stands in the game.
///
/// ```text
///            time hits 0              eliminate
/// Active ─────────────────→ OutOfTime ─────────→ Eliminated
///   ↑  ←───────────────────     │                    │
///   │       time added          └──── eliminate ─────┤
///   └──────────────────── revive ────────────────────┘
/// ```
///
/// A single enum rather than two flags: "out of time" and "eliminated"
/// never need to be tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Still in the game with time on the clock.
    Active,
    /// Clock reached zero. Adding time brings the player back.
    OutOfTime,
    /// Removed from rotation by hand. Only a revive brings them back.
    Eliminated,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::OutOfTime => write!(f, "OutOfTime"),
            Self::Eliminated => write!(f, "Eliminated"),
        }
    }
}

/// One seat's occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Never changes, never reused.
    pub id: PlayerId,
    /// Display name. No uniqueness constraint.
    pub name: String,
    /// Seconds remaining. Zero exactly when the player is not `Active`
    /// because of the clock (or eliminated at zero).
    pub time_left: u32,
    pub status: PlayerStatus,
}

impl Player {
    /// A fresh player with the default `"Player {n}"` name.
    pub fn new(id: PlayerId, time_left: u32) -> Self {
        Self {
            id,
            name: default_name(id),
            time_left,
            status: if time_left > 0 {
                PlayerStatus::Active
            } else {
                PlayerStatus::OutOfTime
            },
        }
    }

    /// `Active` with time left; the only kind of seat the turn can
    /// move to.
    pub fn is_eligible(&self) -> bool {
        self.status == PlayerStatus::Active && self.time_left > 0
    }

    pub fn is_eliminated(&self) -> bool {
        self.status == PlayerStatus::Eliminated
    }
}

/// Seat names are 1-based for humans even though ids start at 0.
pub(crate) fn default_name(id: PlayerId) -> String {
    format!("Player {}", id.0.saturating_add(1))
}
