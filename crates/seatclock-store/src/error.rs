//! Error types for the persistence layer.

/// Errors that can occur while reading, writing, or decoding stored
/// blobs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Turning a value into bytes failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Stored bytes are malformed or have the wrong shape. Usually a
    /// blob written by an older, incompatible build.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The backing medium failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The key can't be used with this store (for example, a path
    /// separator in a [`FileStore`](crate::FileStore) key).
    #[error("invalid store key {0:?}")]
    InvalidKey(String),

    /// A writer panicked while holding the store's lock.
    #[error("store lock poisoned")]
    Poisoned,
}
