//! # Seatclock
//!
//! A table clock for any number of players: one countdown per seat,
//! per-turn increments, manual time adjustment, elimination and revival,
//! seat reordering, and multi-step undo.
//!
//! The rules live in [`ClockStateMachine`](prelude::ClockStateMachine);
//! a [`ClockSession`](prelude::ClockSession) runs one in its own task,
//! feeds it ticks, and keeps it saved.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seatclock::prelude::*;
//!
//! # async fn run() -> Result<(), SeatclockError> {
//! let store = FileStore::open("./clock-data")?;
//! let clock = ClockSession::open(
//!     store,
//!     TickScheduler::every_second(),
//!     NoWakeLock,
//!     SessionConfig::default(),
//!     Some(ClockConfig::new(4, 600, 5)),
//! )?;
//!
//! clock.toggle_running().await?;
//! clock.press_seat(0).await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod telemetry;

pub use error::SeatclockError;

/// Commonly used types, re-exported for `use seatclock::prelude::*`.
pub mod prelude {
    pub use crate::SeatclockError;
    pub use seatclock_core::{
        ClockConfig, ClockPolicy, ClockStateMachine, ConfigError, EliminationPause, GameState,
        Notice, Outcome, Player, PlayerId, PlayerStatus, RenameDraft, format_clock, parse_clock,
    };
    pub use seatclock_session::{
        ClockEvent, ClockHandle, ClockReply, ClockSession, NoWakeLock, SessionConfig,
        SessionError, WakeLock,
    };
    pub use seatclock_store::{
        Codec, FileStore, JsonCodec, KeyValueStore, MemoryStore, StoreError,
    };
    pub use seatclock_tick::{
        ManualTickTrigger, ManualTicker, TickConfig, TickPolicy, TickScheduler, TickSource,
    };
}
