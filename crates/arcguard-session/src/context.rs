//! Request-scoped caller context.
//!
//! A [`PrincipalContext`] lives for exactly one call. It is built by the
//! request-handling layer (usually through
//! [`PrincipalContext::authenticate`]) and handed by reference to the gate.
//! There is no ambient "current user": whoever needs the caller's identity
//! receives the context explicitly.

use crate::{Authenticator, Principal, SessionError};

/// The caller's identity for one call, or its absence.
///
/// ## Lifecycle
///
/// ```text
/// request arrives ──→ authenticate() ──→ gate.check(&ctx, ..) ──→ dropped
///                        │
///                        ├─ no token   → anonymous
///                        ├─ valid      → authenticated(principal)
///                        └─ invalid    → Err(AuthFailed)
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrincipalContext {
    principal: Option<Principal>,
    request_id: Option<String>,
}

impl PrincipalContext {
    /// A context with no caller identity. Every guarded call made with it
    /// is denied.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context for an already-authenticated caller.
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            request_id: None,
        }
    }

    /// Builds a context from an optional request token.
    ///
    /// A missing token yields an anonymous context. A present token must be
    /// accepted by `auth`.
    ///
    /// # Errors
    /// Propagates the authenticator's [`SessionError`] when it rejects the
    /// token. Callers should treat that as a failed request, not as an
    /// anonymous one.
    pub async fn authenticate<A: Authenticator>(
        auth: &A,
        token: Option<&str>,
    ) -> Result<Self, SessionError> {
        let Some(token) = token else {
            tracing::debug!("no token presented, caller is anonymous");
            return Ok(Self::anonymous());
        };

        match auth.authenticate(token).await {
            Ok(principal) => {
                tracing::debug!(player_id = %principal.player_id, "caller authenticated");
                Ok(Self::authenticated(principal))
            }
            Err(e) => {
                tracing::info!(error = %e, "caller authentication rejected");
                Err(e)
            }
        }
    }

    /// Tags this context with a request id, carried into gate log lines.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// The caller, if authenticated.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The caller, or [`SessionError::Unauthenticated`].
    pub fn require(&self) -> Result<&Principal, SessionError> {
        self.principal.as_ref().ok_or(SessionError::Unauthenticated)
    }

    /// The request id, if one was attached.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns `true` if a principal is present.
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

// =========================================================================
// Tests
// =========================================================================
