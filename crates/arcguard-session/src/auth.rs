//! Authentication hook for establishing the caller's identity.
//!
//! Arcguard doesn't authenticate anyone itself; that belongs to your
//! login layer (sessions, JWTs, an identity provider). It only defines the
//! [`Authenticator`] trait: a single async method that takes a token and
//! returns a [`Principal`] or an error. [`PrincipalContext::authenticate`]
//! calls it once per request.
//!
//! [`PrincipalContext::authenticate`]: crate::PrincipalContext::authenticate

use crate::{Principal, SessionError};

/// Validates a caller's token and returns their identity.
///
/// # Trait bounds
///
/// - `Send + Sync` → one authenticator is shared by every request task.
/// - `'static` → it lives as long as the service.
///
/// # Example
///
/// ```rust
/// use arcguard_session::{Authenticator, Principal, SessionError};
/// use arcguard_protocol::PlayerId;
///
/// /// Accepts any numeric token as the player ID.
/// /// Only for development. Never use this in production!
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(
///         &self,
///         token: &str,
///     ) -> Result<Principal, SessionError> {
///         let id: u64 = token.parse().map_err(|_| {
///             SessionError::AuthFailed("token must be a number".into())
///         })?;
///         Ok(Principal::new(PlayerId(id)))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the caller's identity.
    ///
    /// # Returns
    /// - `Ok(Principal)` — authentication succeeded, here's who they are
    /// - `Err(SessionError::AuthFailed)` — token is invalid/expired
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Principal, SessionError>> + Send;
}
