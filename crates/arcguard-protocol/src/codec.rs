//! Codec trait and implementations for decoding manifests and arguments.
//!
//! A "codec" (coder/decoder) converts between Rust values and raw bytes.
//! The guard's manifest loader and request-handling layers only need
//! something that implements [`Codec`]; which format sits behind it is
//! their choice.
//!
//! [`JsonCodec`] is the only implementation today.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust values to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → a single codec can be shared by every task handling
///   guarded calls.
/// - `'static` → the codec owns everything it needs.
///
/// `decode` requires `DeserializeOwned` so the result never borrows from
/// the input buffer; callers usually drop the bytes right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use arcguard_protocol::{CallArguments, Codec, GameId, JsonCodec};
///
/// let codec = JsonCodec;
///
/// // Path variables and a request body, as a router would hand them over.
/// let args: CallArguments = codec.decode(br#"["1", 7, ["ECHO"]]"#).unwrap();
/// assert_eq!(args.len(), 3);
///
/// let bytes = codec.encode(&GameId(1)).unwrap();
/// assert_eq!(bytes, b"1");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
