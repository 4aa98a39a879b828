//! Persistence port for Seatclock.
//!
//! The clock writes its whole state after every change and reads it
//! back when a session opens. It treats storage as a plain key-value
//! byte store: no transactions, no durability promises.
//!
//! - **Store** ([`KeyValueStore`] trait, [`MemoryStore`], [`FileStore`]):
//!   where the bytes live.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how typed values become
//!   bytes.
//! - **Errors** ([`StoreError`]): what can go wrong doing either.
//!
//! ```text
//! Session (typed state) → Codec (bytes) → KeyValueStore (get/set/delete)
//! ```

mod codec;
mod error;
mod file;
mod memory;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A byte store addressed by string keys.
///
/// Implementations only need to be as durable as their medium; callers
/// never rely on a write surviving a crash.
pub trait KeyValueStore: Send + 'static {
    /// Reads the value under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}
