//! Error types for the session layer.

/// Errors that can occur while establishing who the caller is.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Authentication failed: the token was invalid, expired, or rejected
    /// by the [`Authenticator`](crate::Authenticator).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The operation needs an identity, but the caller is anonymous.
    #[error("no authenticated principal")]
    Unauthenticated,
}
