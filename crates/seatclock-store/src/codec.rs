//! Codec trait and implementations for stored blobs.
//!
//! The store only sees bytes. A [`Codec`] decides how a typed value
//! such as the game state is turned into those bytes and back, so the
//! format can change without touching the store or the session.

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreError;

/// Encodes typed values to bytes and decodes them back.
///
/// `DeserializeOwned` because decoded values outlive the buffer they
/// were read from.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if the value can't be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`StoreError::Decode`] if the bytes are malformed or
    /// don't match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, StoreError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that stores values as JSON.
///
/// Readable on disk, which makes a stuck game easy to inspect or fix by
/// hand.
///
/// ```rust
/// use seatclock_store::{Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&vec![3u32, 1, 2]).unwrap();
/// let back: Vec<u32> = codec.decode(&bytes).unwrap();
/// assert_eq!(back, vec![3, 1, 2]);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(value).map_err(StoreError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(data).map_err(StoreError::Decode)
    }
}
