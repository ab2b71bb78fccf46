//! Error types for the protocol layer.
//!
//! Each Arcguard crate defines its own error enum. A `ProtocolError` always
//! means the problem is in turning bytes into values (or back), never in
//! authorization itself.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: malformed JSON, missing required fields, or a value
    /// of the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The document decoded, but its content breaks a protocol rule,
    /// e.g., a manifest declaring a version this build doesn't understand.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
