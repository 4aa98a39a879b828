//! Unified error type for Seatclock.

use seatclock_core::ConfigError;
use seatclock_session::SessionError;
use seatclock_store::StoreError;

/// Top-level error wrapping every crate-specific error, so callers of
/// the facade can use `?` across layers.
#[derive(Debug, thiserror::Error)]
pub enum SeatclockError {
    /// Invalid clock configuration or clock input.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store failed outside a running session.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
