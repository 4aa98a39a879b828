//! The running clock.
//!
//! A session is one tokio task that owns the [`ClockStateMachine`], the
//! store, the tick source and the wake lock. Everything else talks to it
//! through a [`ClockHandle`], so ticks and user intents are applied one
//! at a time in the order they arrive.
//!
//! # How it fits in the stack
//!
//! ```text
//! Presentation (above)  ← calls ClockHandle, listens to ClockEvent
//!     ↕
//! Session (this crate)  ← serializes ticks and intents, persists, wakes
//!     ↕
//! Core / Tick / Store (below)
//! ```
//!
//! [`ClockStateMachine`]: seatclock_core::ClockStateMachine

mod actor;
mod config;
mod error;
mod handle;
mod wake;

pub use actor::ClockSession;
pub use config::SessionConfig;
pub use error::SessionError;
pub use handle::{ClockEvent, ClockHandle, ClockReply};
pub use wake::{NoWakeLock, WakeLock};
