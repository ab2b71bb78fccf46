//! The authorization gate: resolve → look up → evaluate → allow or deny.

use std::future::Future;
use std::sync::Arc;

use arcguard_protocol::{AccessDenied, CallArguments, ResolvedArguments};
use arcguard_registry::PredicateRegistry;
use arcguard_session::{Principal, PrincipalContext};

use crate::{
    AuthorizationDecision, BoundDeclaration, CallOutcome, CallState, DenyReason, GateConfig,
    GateError, ParameterResolver, PredicateDeclaration,
};

/// Decides, before an operation body runs, whether the caller may run it.
///
/// The gate holds the frozen predicate registry behind an `Arc`; cloning
/// the gate is cheap and every clone shares the same registry. Nothing in
/// the gate is mutable, so concurrent checks never observe each other.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    registry: Arc<PredicateRegistry>,
    config: GateConfig,
}

impl AuthorizationGate {
    /// Creates a gate over a registry that is done being filled.
    pub fn new(registry: Arc<PredicateRegistry>, config: GateConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this gate evaluates against.
    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluates `declaration` for `principal` with already-resolved
    /// arguments.
    ///
    /// A predicate returning `false`, failing, or timing out is a
    /// [`AuthorizationDecision::Deny`], never an error.
    ///
    /// # Errors
    /// [`GateError::Registry`] with `UnknownPredicate` if the declaration
    /// names a predicate that isn't registered.
    pub async fn authorize(
        &self,
        declaration: &PredicateDeclaration,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> Result<AuthorizationDecision, GateError> {
        let predicate = self.registry.lookup(&declaration.predicate_name)?;
        let evaluation = predicate.evaluate(principal, args);

        // No lock is held here: the registry is immutable and the predicate
        // only borrows from this call's own principal and arguments.
        let result = match self.config.evaluation_timeout() {
            Some(limit) => match tokio::time::timeout(limit, evaluation).await {
                Ok(result) => result,
                Err(_) => return Ok(AuthorizationDecision::Deny(DenyReason::TimedOut(limit))),
            },
            None => evaluation.await,
        };

        Ok(match result {
            Ok(true) => AuthorizationDecision::Allow,
            Ok(false) => AuthorizationDecision::Deny(DenyReason::PredicateReturnedFalse),
            Err(e) => AuthorizationDecision::Deny(DenyReason::PredicateFailed(e)),
        })
    }

    /// Runs the full per-call check for one bound declaration.
    ///
    /// Always returns a terminal outcome; see [`CallState`] for the steps.
    pub async fn check(
        &self,
        bound: &BoundDeclaration,
        ctx: &PrincipalContext,
        args: &CallArguments,
    ) -> CallOutcome {
        let operation = bound.operation();
        let outcome = self.run_check(bound, ctx, args).await;
        log_outcome(operation, ctx, bound.declaration(), &outcome);
        outcome
    }

    async fn run_check(
        &self,
        bound: &BoundDeclaration,
        ctx: &PrincipalContext,
        args: &CallArguments,
    ) -> CallOutcome {
        let operation = bound.operation();
        let mut state = CallState::Pending;

        let Some(principal) = ctx.principal() else {
            state.advance(CallState::Denied, operation);
            return CallOutcome::Denied(DenyReason::Unauthenticated);
        };

        let resolved = if bound.positions().is_empty() {
            ResolvedArguments::new()
        } else {
            state = state.advance(CallState::Resolving, operation);
            match ParameterResolver::resolve(bound, args) {
                Ok(resolved) => resolved,
                Err(e) => {
                    state.advance(CallState::Failed, operation);
                    return CallOutcome::Failed(e.into());
                }
            }
        };

        state = state.advance(CallState::Evaluating, operation);
        match self.authorize(bound.declaration(), principal, &resolved).await {
            Ok(decision) => {
                let outcome = CallOutcome::from(decision);
                state.advance(outcome.state(), operation);
                outcome
            }
            Err(e) => {
                state.advance(CallState::Failed, operation);
                CallOutcome::Failed(e)
            }
        }
    }

    /// Checks the call and, only if allowed, runs `body`.
    ///
    /// `body` is a closure producing the operation's future. It is only
    /// invoked when the outcome is [`CallOutcome::Allowed`], so no part of
    /// the operation runs for a rejected call. If the returned future is
    /// dropped before the decision (caller cancelled, request timed out),
    /// the decision is discarded and `body` never runs.
    ///
    /// # Errors
    /// [`AccessDenied`] for every outcome other than `Allowed`.
    pub async fn guard<F, Fut, T>(
        &self,
        bound: &BoundDeclaration,
        ctx: &PrincipalContext,
        args: &CallArguments,
        body: F,
    ) -> Result<T, AccessDenied>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let outcome = self.check(bound, ctx, args).await;
        match outcome.rejection(self.config.expose_deny_reasons) {
            None => Ok(body().await),
            Some(denied) => Err(denied),
        }
    }
}

fn log_outcome(
    operation: &str,
    ctx: &PrincipalContext,
    declaration: &PredicateDeclaration,
    outcome: &CallOutcome,
) {
    let player_id = ctx.principal().map(|p| p.player_id.to_string());
    let player_id = player_id.as_deref().unwrap_or("anonymous");
    let request_id = ctx.request_id().unwrap_or("-");

    match outcome {
        CallOutcome::Allowed => {
            tracing::debug!(%operation, %player_id, %request_id, %declaration, "call allowed");
        }
        CallOutcome::Denied(reason) => {
            tracing::warn!(
                %operation,
                %player_id,
                %request_id,
                %declaration,
                %reason,
                "call denied"
            );
        }
        CallOutcome::Failed(error) => {
            tracing::warn!(
                %operation,
                %player_id,
                %request_id,
                %declaration,
                %error,
                "call failed authorization"
            );
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
