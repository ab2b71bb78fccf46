//! `Guard` builder and the per-call entry points.
//!
//! This is what applications hold on to. It ties the layers together:
//! registry (predicates) → operation table (declarations) → gate (checks).

use std::future::Future;
use std::sync::Arc;

use arcguard_gate::{
    AuthorizationGate, CallOutcome, GateConfig, OperationSignature, OperationTable,
    OperationTableBuilder, PredicateDeclaration,
};
use arcguard_protocol::{CallArguments, ResolvedArguments};
use arcguard_registry::{Predicate, PredicateError, PredicateRegistry, RegistryError};
use arcguard_session::{Principal, PrincipalContext};

use crate::{ArcguardError, GuardManifest};

/// Shared state behind every clone of a [`Guard`].
#[derive(Debug)]
struct GuardInner {
    gate: AuthorizationGate,
    table: OperationTable,
}

/// Builder for configuring and validating a [`Guard`].
///
/// Registration and declaration calls only collect; every check happens in
/// [`build()`](Self::build).
///
/// # Example
///
/// ```rust
/// use arcguard::prelude::*;
///
/// let guard = Guard::builder()
///     .predicate_fn("isMyPlayer", |p: &Principal, args: &ResolvedArguments| {
///         Ok(args.player_id("playerId") == Some(p.player_id))
///     })
///     .operation(OperationSignature::new(
///         "players.save_roles",
///         ["gameId", "playerId", "roles"],
///     ))
///     .declare(
///         "players.save_roles",
///         PredicateDeclaration::new("isMyPlayer", ["gameId", "playerId"]),
///     )
///     .build()?;
///
/// assert!(guard.is_guarded("players.save_roles"));
/// # Ok::<(), ArcguardError>(())
/// ```
#[derive(Debug)]
pub struct GuardBuilder {
    registry: PredicateRegistry,
    table: OperationTableBuilder,
    config: GateConfig,
    registration_error: Option<RegistryError>,
}

impl GuardBuilder {
    /// Creates a builder with no predicates, no operations and the default
    /// configuration.
    pub fn new() -> Self {
        Self {
            registry: PredicateRegistry::new(),
            table: OperationTableBuilder::new(),
            config: GateConfig::default(),
            registration_error: None,
        }
    }

    /// Registers a predicate under `name`.
    ///
    /// A duplicate name is reported by [`build()`](Self::build).
    pub fn predicate<P: Predicate>(mut self, name: impl Into<String>, predicate: P) -> Self {
        if let Err(e) = self.registry.register(name, predicate) {
            self.registration_error.get_or_insert(e);
        }
        self
    }

    /// Registers a synchronous closure as a predicate. The closure runs
    /// inline and must not block; use
    /// [`predicate_blocking`](Self::predicate_blocking) for one that does.
    pub fn predicate_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
            + Send
            + Sync
            + 'static,
    {
        if let Err(e) = self.registry.register_fn(name, f) {
            self.registration_error.get_or_insert(e);
        }
        self
    }

    /// Registers a synchronous closure that may block. Each evaluation runs
    /// on tokio's blocking pool, so the evaluation timeout still applies.
    pub fn predicate_blocking<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
            + Send
            + Sync
            + 'static,
    {
        if let Err(e) = self.registry.register_blocking(name, f) {
            self.registration_error.get_or_insert(e);
        }
        self
    }

    /// Adds an operation.
    pub fn operation(mut self, signature: OperationSignature) -> Self {
        self.table = self.table.operation(signature);
        self
    }

    /// Guards `operation` with `declaration`.
    pub fn declare(
        mut self,
        operation: impl Into<String>,
        declaration: PredicateDeclaration,
    ) -> Self {
        self.table = self.table.declare(operation, declaration);
        self
    }

    /// Guards every operation of `service` that has no declaration of its
    /// own.
    pub fn declare_service(
        mut self,
        service: impl Into<String>,
        declaration: PredicateDeclaration,
    ) -> Self {
        self.table = self.table.declare_service(service, declaration);
        self
    }

    /// Adds `variant` as another implementation of `base`.
    pub fn inherit(mut self, variant: impl Into<String>, base: impl Into<String>) -> Self {
        self.table = self.table.inherit(variant, base);
        self
    }

    /// Sets the gate configuration.
    pub fn config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Applies everything in `manifest`, including its configuration.
    pub fn manifest(mut self, manifest: GuardManifest) -> Self {
        self.config = manifest.config;
        for op in manifest.operations {
            let name = op.signature.name.clone();
            self.table = self.table.operation(op.signature);
            if let Some(guard) = op.guard {
                self.table = self.table.declare(name, guard);
            }
        }
        for service in manifest.services {
            self.table = self.table.declare_service(service.name, service.guard);
        }
        for variant in manifest.variants {
            self.table = self.table.inherit(variant.name, variant.implements);
        }
        self
    }

    /// Validates every declaration and freezes the guard.
    ///
    /// # Errors
    ///
    /// - [`ArcguardError::Registry`] for a duplicate or unknown predicate
    /// - [`ArcguardError::Gate`] for an undeclared parameter name, an
    ///   unknown or duplicate operation, an unknown service, or a second
    ///   declaration on one operation
    ///
    /// Any of these should abort startup.
    pub fn build(self) -> Result<Guard, ArcguardError> {
        if let Some(e) = self.registration_error {
            return Err(e.into());
        }

        let table = self.table.build(&self.registry)?;
        tracing::info!(
            predicates = self.registry.len(),
            operations = table.len(),
            timeout_ms = self.config.evaluation_timeout_ms,
            "guard ready"
        );

        let gate = AuthorizationGate::new(Arc::new(self.registry), self.config);
        Ok(Guard {
            inner: Arc::new(GuardInner { gate, table }),
        })
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated, immutable set of guarded operations.
///
/// Cloning is an `Arc` bump; hand a clone to every task serving calls.
#[derive(Debug, Clone)]
pub struct Guard {
    inner: Arc<GuardInner>,
}

impl Guard {
    /// Creates a new builder.
    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    /// Decides whether `ctx` may call `operation` with `args`.
    ///
    /// An operation without a declaration is allowed. An operation name
    /// that was never registered fails with
    /// [`GateError::UnknownOperation`](arcguard_gate::GateError), which
    /// rejects the call.
    pub async fn check(
        &self,
        operation: &str,
        ctx: &PrincipalContext,
        args: &CallArguments,
    ) -> CallOutcome {
        match self.inner.table.guard_for(operation) {
            Ok(Some(bound)) => self.inner.gate.check(bound, ctx, args).await,
            Ok(None) => {
                tracing::trace!(%operation, "unguarded operation");
                CallOutcome::Allowed
            }
            Err(e) => {
                tracing::warn!(%operation, error = %e, "call to unregistered operation");
                CallOutcome::Failed(e)
            }
        }
    }

    /// Checks the call and runs `body` only if it is allowed.
    ///
    /// Dropping the returned future before the decision discards it;
    /// `body` is never invoked in that case.
    ///
    /// # Errors
    /// [`ArcguardError::Denied`] for every outcome other than allowed.
    /// Whether the message carries the reason depends on
    /// [`GateConfig::expose_deny_reasons`].
    pub async fn call<F, Fut, T>(
        &self,
        operation: &str,
        ctx: &PrincipalContext,
        args: &CallArguments,
        body: F,
    ) -> Result<T, ArcguardError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let outcome = self.check(operation, ctx, args).await;
        match outcome.rejection(self.config().expose_deny_reasons) {
            None => Ok(body().await),
            Some(denied) => Err(ArcguardError::Denied(denied)),
        }
    }

    /// Returns `true` if `operation` exists and carries a declaration.
    pub fn is_guarded(&self, operation: &str) -> bool {
        self.inner.table.is_guarded(operation)
    }

    /// The validated operation table.
    pub fn operations(&self) -> &OperationTable {
        &self.inner.table
    }

    /// The gate configuration in effect.
    pub fn config(&self) -> &GateConfig {
        self.inner.gate.config()
    }
}
