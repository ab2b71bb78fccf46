//! Authorization decisions and per-call outcomes.

use std::time::Duration;

use arcguard_protocol::AccessDenied;
use arcguard_registry::PredicateError;

use crate::{CallState, GateError};

/// Why a call was denied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    /// The caller has no principal.
    #[error("caller is not authenticated")]
    Unauthenticated,

    /// The predicate ran and said no.
    #[error("predicate returned false")]
    PredicateReturnedFalse,

    /// The predicate itself failed; its error is kept for diagnostics.
    #[error("predicate failed: {0}")]
    PredicateFailed(PredicateError),

    /// The predicate didn't answer within the configured timeout.
    #[error("predicate timed out after {0:?}")]
    TimedOut(Duration),
}

/// The result of evaluating one declaration for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow,
    Deny(DenyReason),
}

impl AuthorizationDecision {
    /// Returns `true` for [`Allow`](Self::Allow).
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The terminal outcome of a full gate check.
///
/// Unlike [`AuthorizationDecision`], this also covers calls that never
/// reached a predicate: missing arguments, unknown predicates or
/// operations. Only `Allowed` lets the operation body run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Allowed,
    Denied(DenyReason),
    Failed(GateError),
}

impl CallOutcome {
    /// Returns `true` for [`Allowed`](Self::Allowed).
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The terminal [`CallState`] this outcome corresponds to.
    pub fn state(&self) -> CallState {
        match self {
            Self::Allowed => CallState::Allowed,
            Self::Denied(_) => CallState::Denied,
            Self::Failed(_) => CallState::Failed,
        }
    }

    /// The caller-visible rejection for this outcome, or `None` if allowed.
    ///
    /// With `expose_reason` off every rejection is the same opaque
    /// `403 access denied`.
    pub fn rejection(&self, expose_reason: bool) -> Option<AccessDenied> {
        let denied = match self {
            Self::Allowed => return None,
            Self::Denied(reason) if expose_reason => AccessDenied::with_reason(reason),
            Self::Failed(err) if expose_reason => AccessDenied::with_reason(err),
            Self::Denied(_) | Self::Failed(_) => AccessDenied::new(),
        };
        Some(denied)
    }
}

impl From<AuthorizationDecision> for CallOutcome {
    fn from(decision: AuthorizationDecision) -> Self {
        match decision {
            AuthorizationDecision::Allow => Self::Allowed,
            AuthorizationDecision::Deny(reason) => Self::Denied(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcguard_registry::RegistryError;

    #[test]
    fn test_rejection_allowed_is_none() {
        assert_eq!(CallOutcome::Allowed.rejection(true), None);
    }

    #[test]
    fn test_rejection_hides_reason_by_default() {
        let missing_game = CallOutcome::Denied(DenyReason::PredicateFailed(
            PredicateError::not_found("game", "G-1"),
        ));
        let not_owner = CallOutcome::Denied(DenyReason::PredicateReturnedFalse);

        // Callers must not be able to tell these two apart.
        assert_eq!(missing_game.rejection(false), not_owner.rejection(false));
        assert_eq!(missing_game.rejection(false), Some(AccessDenied::new()));
    }

    #[test]
    fn test_rejection_exposes_reason_when_configured() {
        let outcome = CallOutcome::Failed(GateError::Registry(RegistryError::UnknownPredicate(
            "isMyPlayer".into(),
        )));

        let denied = outcome.rejection(true).unwrap();

        assert_eq!(denied.message, "access denied: unknown predicate `isMyPlayer`");
    }

    #[test]
    fn test_outcome_state_is_terminal() {
        assert_eq!(CallOutcome::Allowed.state(), CallState::Allowed);
        assert_eq!(
            CallOutcome::Denied(DenyReason::Unauthenticated).state(),
            CallState::Denied
        );
        assert!(CallOutcome::Allowed.state().is_terminal());
    }

    #[test]
    fn test_from_decision_maps_variants() {
        assert_eq!(CallOutcome::from(AuthorizationDecision::Allow), CallOutcome::Allowed);
        assert_eq!(
            CallOutcome::from(AuthorizationDecision::Deny(DenyReason::PredicateReturnedFalse)),
            CallOutcome::Denied(DenyReason::PredicateReturnedFalse)
        );
    }
}
