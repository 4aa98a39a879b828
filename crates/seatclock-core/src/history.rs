//! Undo history.

use crate::GameState;

/// Last-in-first-out stack of whole-state snapshots.
///
/// Snapshots are owned values, cloned from the live state before it is
/// touched. Nothing is shared between entries or with the live state,
/// so mutating the game can never reach back into an entry.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<GameState>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `snapshot` as the most recent undo point.
    pub fn push(&mut self, snapshot: GameState) {
        self.snapshots.push(snapshot);
    }

    /// Removes and returns the most recent undo point.
    pub fn pop(&mut self) -> Option<GameState> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
