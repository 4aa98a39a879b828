//! Turn clock state machine for Seatclock.
//!
//! A generalized chess clock for N seats: one seat counts down at a
//! time, pressing the seat hands the turn to the next eligible seat, and
//! every user action can be undone.
//!
//! # Key types
//!
//! - [`ClockStateMachine`]: owns the live [`GameState`] and the undo
//!   [`History`]; the only mutation surface
//! - [`GameState`] / [`Player`] / [`PlayerStatus`]: the data model
//! - [`ClockConfig`]: seat count, time per seat, increment
//! - [`ClockPolicy`]: switches for behaviors that differ between
//!   table conventions
//! - [`Outcome`] / [`Notice`]: what an operation did
//!
//! The machine does not own time. Something external (see
//! `seatclock-tick`) calls [`ClockStateMachine::tick`] once per second
//! while [`GameState::running`] is set.

mod config;
mod error;
mod format;
mod history;
mod machine;
mod player;
mod rotation;
mod state;

pub use config::{ClockConfig, ClockPolicy, EliminationPause};
pub use error::ConfigError;
pub use format::{format_clock, parse_clock};
pub use history::History;
pub use machine::{ClockStateMachine, Notice, Outcome, RenameDraft};
pub use player::{Player, PlayerId, PlayerStatus};
pub use rotation::{next_active, remap_after_move};
pub use state::{GameState, InvariantViolation};
