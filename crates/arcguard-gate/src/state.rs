//! The per-call authorization state machine.

use std::fmt;

/// Where one guarded call is in its authorization.
///
/// ```text
///            ┌──────────→ Denied            (anonymous caller)
///            │
/// Pending ───┼─→ Resolving ─→ Evaluating ─→ Allowed
///            │       │            │    └──→ Denied
///            │       ▼            ▼
///            │     Failed       Failed      (unknown predicate)
///            │  (parameter)
///            └──────────────→ Evaluating    (declaration without parameters)
/// ```
///
/// `Allowed`, `Denied`, and `Failed` are terminal. A failed call is
/// rejected exactly like a denied one; the distinction only matters for
/// logs, since a failure points at a configuration or wiring defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Pending,
    Resolving,
    Evaluating,
    Allowed,
    Denied,
    Failed,
}

impl CallState {
    /// Returns `true` once the call's fate is decided.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Allowed | Self::Denied | Self::Failed)
    }

    /// Returns `true` if moving from `self` to `target` is a legal step.
    pub fn can_transition_to(self, target: Self) -> bool {
        use CallState::*;
        matches!(
            (self, target),
            (Pending, Resolving | Evaluating | Denied)
                | (Resolving, Evaluating | Failed)
                | (Evaluating, Allowed | Denied | Failed)
        )
    }

    /// Steps to `target`, tracing the transition.
    ///
    /// An illegal step is a gate bug; it trips a debug assertion and, in
    /// release builds, still moves to `target` so the caller's own
    /// fail-closed handling decides the outcome.
    pub(crate) fn advance(self, target: Self, operation: &str) -> Self {
        debug_assert!(
            self.can_transition_to(target),
            "illegal call state transition {self} -> {target}"
        );
        tracing::trace!(%operation, from = %self, to = %target, "call state");
        target
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Resolving => write!(f, "Resolving"),
            Self::Evaluating => write!(f, "Evaluating"),
            Self::Allowed => write!(f, "Allowed"),
            Self::Denied => write!(f, "Denied"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}
