//! Error types for the session layer.

use seatclock_core::ConfigError;
use seatclock_store::StoreError;

/// Errors that can occur while opening or talking to a clock session.
///
/// Clock operations themselves never fail; these only come from the
/// edges: a stopped actor, a bad configuration, or the store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session task has stopped (after `exit` or `shutdown`).
    #[error("clock session is unavailable")]
    Unavailable,

    /// Nothing stored under the config key and no fallback supplied.
    #[error("no clock configuration stored under {0:?}")]
    MissingConfig(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
