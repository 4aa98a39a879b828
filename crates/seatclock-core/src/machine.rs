//! The clock state machine.
//!
//! Every user-facing operation follows the same shape: check the guard,
//! snapshot the state into the history, mutate. A failed guard is a
//! silent no-op that leaves both the state and the history untouched,
//! so callers never have to handle errors from the clock itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::rotation::{next_active, remap_after_move};
use crate::{ClockConfig, ClockPolicy, EliminationPause, GameState, History, PlayerId, PlayerStatus};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Something the table should be told about, beyond the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// A seat's clock ran down to zero.
    OutOfTime(PlayerId),
    /// An elimination left no seat that can take the turn. The clock is
    /// paused and stays that way until someone is revived or given time.
    NoActivePlayersLeft,
}

/// What an operation did. The resulting state is read back through
/// [`ClockStateMachine::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// `false` for guarded no-ops.
    pub changed: bool,
    pub notice: Option<Notice>,
}

impl Outcome {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            notice: None,
        }
    }

    fn with_notice(notice: Option<Notice>) -> Self {
        Self {
            changed: true,
            notice,
        }
    }
}

// ---------------------------------------------------------------------------
// RenameDraft
// ---------------------------------------------------------------------------

/// A staged set of name edits.
///
/// Taken from the machine with [`ClockStateMachine::rename_draft`],
/// edited freely, then committed in one step with
/// [`ClockStateMachine::rename_all`]. Edits to the draft never touch the
/// live game, so abandoning it is free.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenameDraft {
    names: BTreeMap<PlayerId, String>,
}

impl RenameDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `name` for player `id`, replacing any earlier edit.
    pub fn set(&mut self, id: PlayerId, name: impl Into<String>) -> &mut Self {
        self.names.insert(id, name.into());
        self
    }

    pub fn name(&self, id: PlayerId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(PlayerId, String)> for RenameDraft {
    fn from_iter<I: IntoIterator<Item = (PlayerId, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ClockStateMachine
// ---------------------------------------------------------------------------

/// Owns the authoritative [`GameState`] and its undo [`History`].
///
/// Single-writer: it is `&mut self` all the way down, so whoever owns
/// the machine (the session actor) serializes ticks and user intents.
#[derive(Debug, Clone)]
pub struct ClockStateMachine {
    config: ClockConfig,
    policy: ClockPolicy,
    state: GameState,
    history: History,
}

impl ClockStateMachine {
    /// Starts a fresh game from `config`.
    ///
    /// `config` is expected to be validated already; see
    /// [`ClockConfig::validate`].
    pub fn new(config: ClockConfig, policy: ClockPolicy) -> Self {
        Self {
            state: GameState::initialize(&config),
            config,
            policy,
            history: History::new(),
        }
    }

    /// Resumes a game from a previously stored state, verbatim. The
    /// history starts empty.
    pub fn restore(config: ClockConfig, policy: ClockPolicy, state: GameState) -> Self {
        Self {
            config,
            policy,
            state,
            history: History::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn policy(&self) -> &ClockPolicy {
        &self.policy
    }

    /// Number of operations that can currently be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// A draft pre-filled with every player's current name.
    pub fn rename_draft(&self) -> RenameDraft {
        self.state
            .players
            .iter()
            .map(|p| (p.id, p.name.clone()))
            .collect()
    }

    // -- Time ---------------------------------------------------------------

    /// One second passes on the current seat.
    ///
    /// Only counts down while running and only on an `Active` seat. A
    /// seat that reaches zero goes `OutOfTime`, the clock pauses, and
    /// the turn moves to the next eligible seat if there is one. Not
    /// recorded in the history.
    pub fn tick(&mut self) -> Outcome {
        if !self.state.running {
            return Outcome::unchanged();
        }
        let index = self.state.current_player_index;
        let Some(player) = self.state.players.get_mut(index) else {
            return Outcome::unchanged();
        };
        if player.status != PlayerStatus::Active {
            return Outcome::unchanged();
        }

        player.time_left = player.time_left.saturating_sub(1);
        trace!(player = %player.id, time_left = player.time_left, "tick");
        if player.time_left > 0 {
            return Outcome::changed();
        }

        player.status = PlayerStatus::OutOfTime;
        let id = player.id;
        info!(player = %id, "player ran out of time");
        self.pause_and_pass_turn();
        Outcome::with_notice(Some(Notice::OutOfTime(id)))
    }

    // -- Running ------------------------------------------------------------

    /// Starts or pauses the clock.
    ///
    /// Refused while no seat is eligible. The turn stays where it is,
    /// even on a seat that can't count down.
    pub fn toggle_running(&mut self) -> Outcome {
        if !self.state.has_eligible() {
            debug!("toggle running refused: no eligible seat");
            return Outcome::unchanged();
        }
        self.checkpoint();

        self.state.running = !self.state.running;
        debug!(running = self.state.running, "clock toggled");
        Outcome::changed()
    }

    /// The current seat passes the turn (pressed its clock while
    /// running).
    ///
    /// Ignored unless the clock is running, `seat` is the current seat,
    /// and that seat is eligible. Adds the increment to the passing seat
    /// and moves to the next eligible seat.
    pub fn advance_turn(&mut self, seat: usize) -> Outcome {
        let current = self.state.current_player_index;
        if !self.state.running || seat != current || !self.state.is_seat_eligible(seat) {
            debug!(seat, current, "advance turn refused");
            return Outcome::unchanged();
        }
        self.checkpoint();

        let increment = self.config.increment_seconds;
        if let Some(player) = self.state.players.get_mut(seat) {
            if increment > 0 && player.status == PlayerStatus::Active {
                player.time_left = player.time_left.saturating_add(increment);
            }
        }

        match next_active(&self.state.players, current) {
            Some(next) => {
                self.state.current_player_index = next;
                debug!(from = current, to = next, "turn passed");
            }
            None => {
                if self.policy.pause_when_advance_exhausted {
                    self.state.running = false;
                }
                debug!(seat, "no eligible seat to pass the turn to");
            }
        }
        Outcome::changed()
    }

    /// The current seat restarts a paused clock.
    ///
    /// Ignored unless paused and `seat` is the current, eligible seat.
    pub fn resume_from_pause(&mut self, seat: usize) -> Outcome {
        if self.state.running
            || seat != self.state.current_player_index
            || !self.state.is_seat_eligible(seat)
        {
            debug!(seat, "resume refused");
            return Outcome::unchanged();
        }
        self.toggle_running()
    }

    /// A seat was pressed: pass the turn while running, resume while
    /// paused.
    pub fn press_seat(&mut self, seat: usize) -> Outcome {
        if self.state.running {
            self.advance_turn(seat)
        } else {
            self.resume_from_pause(seat)
        }
    }

    // -- Adjustments --------------------------------------------------------

    /// Adds (or with a negative `delta`, removes) time from a player.
    ///
    /// The result never drops below zero. Reaching zero makes an
    /// `Active` player `OutOfTime`; going above zero brings an
    /// `OutOfTime` player back. Eliminated players keep their status.
    /// Taking the running seat to zero behaves like the clock running
    /// out. Every call on a known id records an undo point, even one
    /// that moves nothing; unknown ids are ignored.
    pub fn add_time(&mut self, id: PlayerId, delta: i64) -> Outcome {
        let Some(seat) = self.state.seat_of(id) else {
            debug!(player = %id, "add time: unknown player");
            return Outcome::unchanged();
        };
        self.checkpoint();

        let Some(player) = self.state.players.get_mut(seat) else {
            return Outcome::unchanged();
        };
        let adjusted = i64::from(player.time_left)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        player.time_left = u32::try_from(adjusted).unwrap_or(u32::MAX);

        let expired = match player.status {
            PlayerStatus::OutOfTime if player.time_left > 0 => {
                player.status = PlayerStatus::Active;
                false
            }
            PlayerStatus::Active if player.time_left == 0 => {
                player.status = PlayerStatus::OutOfTime;
                true
            }
            _ => false,
        };
        debug!(player = %id, delta, time_left = player.time_left, "time adjusted");

        if expired && self.state.running && seat == self.state.current_player_index {
            self.pause_and_pass_turn();
            return Outcome::with_notice(Some(Notice::OutOfTime(id)));
        }
        Outcome::changed()
    }

    /// Eliminates a player, or revives one already eliminated.
    ///
    /// Eliminating the current seat pauses the clock and passes the turn
    /// when the game is running (or always, under
    /// [`EliminationPause::Always`]). If nobody eligible is left the
    /// outcome carries [`Notice::NoActivePlayersLeft`].
    ///
    /// A revived player comes back `Active` (or `OutOfTime` at zero
    /// seconds), time untouched. If the turn was sitting on a seat that
    /// can't play, the revived player takes it and the clock pauses.
    pub fn toggle_elimination(&mut self, id: PlayerId) -> Outcome {
        let Some(seat) = self.state.seat_of(id) else {
            debug!(player = %id, "toggle elimination: unknown player");
            return Outcome::unchanged();
        };
        self.checkpoint();

        let current = self.state.current_player_index;
        let Some(player) = self.state.players.get_mut(seat) else {
            return Outcome::unchanged();
        };

        if player.is_eliminated() {
            player.status = if player.time_left > 0 {
                PlayerStatus::Active
            } else {
                PlayerStatus::OutOfTime
            };
            let revived_eligible = player.is_eligible();
            info!(player = %id, status = %player.status, "player revived");

            if revived_eligible && (seat == current || !self.state.is_seat_eligible(current)) {
                self.state.current_player_index = seat;
                self.state.running = false;
            }
            return Outcome::changed();
        }

        player.status = PlayerStatus::Eliminated;
        info!(player = %id, "player eliminated");

        let pause = match self.policy.elimination_pause {
            EliminationPause::WhenRunning => self.state.running,
            EliminationPause::Always => true,
        };
        if seat == current && pause {
            self.pause_and_pass_turn();
        }

        if self.state.has_eligible() {
            Outcome::changed()
        } else {
            info!("no active players left");
            Outcome::with_notice(Some(Notice::NoActivePlayersLeft))
        }
    }

    /// Moves the seat at `from` to `to`, shifting the seats in between.
    ///
    /// The turn stays with the same player. Ignored when the indices are
    /// equal or out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> Outcome {
        let len = self.state.players.len();
        if from == to || from >= len || to >= len {
            debug!(from, to, len, "reorder ignored");
            return Outcome::unchanged();
        }
        self.checkpoint();

        let moved = self.state.players.remove(from);
        self.state.players.insert(to, moved);
        self.state.current_player_index =
            remap_after_move(self.state.current_player_index, from, to);
        debug!(from, to, current = self.state.current_player_index, "seat moved");
        Outcome::changed()
    }

    /// Commits staged name edits in one undoable step.
    ///
    /// Names for unknown ids are dropped. Ignored when the draft would
    /// change nothing.
    pub fn rename_all(&mut self, draft: &RenameDraft) -> Outcome {
        self.checkpoint();

        for player in &mut self.state.players {
            if let Some(name) = draft.name(player.id) {
                player.name = name.to_string();
            }
        }
        debug!(renamed = draft.len(), "players renamed");
        Outcome::changed()
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Resets every clock for another game with the same table.
    ///
    /// Seats go back to the full allowance and `Active`. With
    /// `preserve_eliminated`, eliminated players stay eliminated at zero.
    /// The turn returns to seat 0, paused. Clears the history rather
    /// than recording an undo point.
    pub fn new_game(&mut self, preserve_eliminated: bool) -> Outcome {
        let before = self.state.clone();
        self.history.clear();

        let allowance = self.config.seconds_per_seat;
        for player in &mut self.state.players {
            if preserve_eliminated && player.is_eliminated() {
                player.time_left = 0;
            } else {
                player.time_left = allowance;
                player.status = PlayerStatus::Active;
            }
        }
        self.state.current_player_index = 0;
        self.state.running = false;
        info!(preserve_eliminated, "new game");

        Outcome {
            changed: self.state != before,
            notice: None,
        }
    }

    /// [`new_game`](Self::new_game) using the configured
    /// [`ClockPolicy::preserve_eliminated_on_new_game`].
    pub fn new_game_with_policy(&mut self) -> Outcome {
        self.new_game(self.policy.preserve_eliminated_on_new_game)
    }

    /// Restores the state from before the most recent undoable
    /// operation. Undo itself can't be undone.
    pub fn undo(&mut self) -> Outcome {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                debug!(remaining = self.history.len(), "undo");
                Outcome::changed()
            }
            None => Outcome::unchanged(),
        }
    }

    // -- Internals ----------------------------------------------------------

    fn checkpoint(&mut self) {
        self.history.push(self.state.clone());
    }

    /// Stops the clock and hands the turn to the next eligible seat, if
    /// any. The index stays put when nobody can play.
    fn pause_and_pass_turn(&mut self) {
        self.state.running = false;
        if let Some(next) = next_active(&self.state.players, self.state.current_player_index) {
            self.state.current_player_index = next;
        }
    }
}
