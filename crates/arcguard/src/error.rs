//! Unified error type for the Arcguard framework.

use arcguard_gate::GateError;
use arcguard_protocol::{AccessDenied, ProtocolError};
use arcguard_registry::RegistryError;
use arcguard_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `arcguard` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ArcguardError {
    /// A manifest couldn't be decoded or has an unsupported version.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Authenticating the caller failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A predicate was registered twice or is missing.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Startup validation of the operation table failed.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// A guarded call was rejected. This is the only per-call variant.
    #[error("{0}")]
    Denied(AccessDenied),
}

impl ArcguardError {
    /// Returns `true` for a rejected call (as opposed to a setup error).
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }
}

impl From<AccessDenied> for ArcguardError {
    fn from(denied: AccessDenied) -> Self {
        Self::Denied(denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcguard_gate::ResolveError;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("manifest version 2".into());
        let arcguard_err: ArcguardError = err.into();
        assert!(matches!(arcguard_err, ArcguardError::Protocol(_)));
        assert!(arcguard_err.to_string().contains("manifest version 2"));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let arcguard_err: ArcguardError = err.into();
        assert!(matches!(arcguard_err, ArcguardError::Session(_)));
    }

    #[test]
    fn test_from_registry_error() {
        let err = RegistryError::DuplicatePredicate("isMyPlayer".into());
        let arcguard_err: ArcguardError = err.into();
        assert!(matches!(arcguard_err, ArcguardError::Registry(_)));
    }

    #[test]
    fn test_from_gate_error_keeps_message() {
        let err = GateError::from(ResolveError::ParameterNotFound {
            operation: "games.add_vote".into(),
            parameter: "gameId".into(),
        });
        let arcguard_err: ArcguardError = err.into();
        assert!(matches!(arcguard_err, ArcguardError::Gate(_)));
        assert_eq!(
            arcguard_err.to_string(),
            "operation `games.add_vote` has no parameter named `gameId`"
        );
    }

    #[test]
    fn test_from_access_denied_is_denied() {
        let arcguard_err: ArcguardError = AccessDenied::new().into();
        assert!(arcguard_err.is_denied());
        assert_eq!(arcguard_err.to_string(), "403 access denied");
    }
}
