//! The `Predicate` trait and its type-erased, registered form.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use arcguard_protocol::ResolvedArguments;
use arcguard_session::Principal;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::PredicateError;

/// A named authorization check: `(Principal, ResolvedArguments) -> bool`.
///
/// Implementations must be pure with respect to the call: the same
/// principal and arguments against the same store state give the same
/// answer. They may be asynchronous (e.g., query a database); the gate
/// awaits them without holding any lock.
///
/// # Example
///
/// ```rust
/// use arcguard_protocol::ResolvedArguments;
/// use arcguard_registry::{Predicate, PredicateError};
/// use arcguard_session::Principal;
///
/// /// Allows a call only when `playerId` is the caller's own player.
/// struct IsSelf;
///
/// impl Predicate for IsSelf {
///     async fn evaluate(
///         &self,
///         principal: &Principal,
///         args: &ResolvedArguments,
///     ) -> Result<bool, PredicateError> {
///         let player = args
///             .player_id("playerId")
///             .ok_or_else(|| PredicateError::invalid_argument("playerId"))?;
///         Ok(principal.is_player(player))
///     }
/// }
/// ```
pub trait Predicate: Send + Sync + 'static {
    /// Decides whether `principal` may perform the call described by `args`.
    ///
    /// # Returns
    /// - `Ok(true)` — allow
    /// - `Ok(false)` — deny
    /// - `Err(_)` — the check itself failed; the gate denies the call
    fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> impl Future<Output = Result<bool, PredicateError>> + Send;
}

// ---------------------------------------------------------------------------
// FnPredicate
// ---------------------------------------------------------------------------

/// Adapts a synchronous, non-blocking closure into a [`Predicate`].
///
/// The closure runs inline on the task checking the call, so it must not
/// block: a blocking closure stalls the runtime worker and the gate's
/// evaluation timeout can't fire until it returns. Use
/// [`BlockingPredicate`] for closures that do blocking I/O.
///
/// Register it with
/// [`PredicateRegistry::register_fn`](crate::PredicateRegistry::register_fn).
pub struct FnPredicate<F>(pub F);

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
        + Send
        + Sync
        + 'static,
{
    fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> impl Future<Output = Result<bool, PredicateError>> + Send {
        std::future::ready((self.0)(principal, args))
    }
}

// ---------------------------------------------------------------------------
// BlockingPredicate
// ---------------------------------------------------------------------------

/// Adapts a synchronous closure that may block (file or database access
/// through a blocking client) into a [`Predicate`].
///
/// Each evaluation runs on tokio's blocking thread pool via
/// `spawn_blocking`, so the calling task keeps yielding and the gate's
/// timeout can abandon it. An abandoned evaluation still runs to
/// completion on its pool thread; its result is discarded.
///
/// Register it with
/// [`PredicateRegistry::register_blocking`](crate::PredicateRegistry::register_blocking).
pub struct BlockingPredicate<F>(Arc<F>);

impl<F> BlockingPredicate<F> {
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl<F> Predicate for BlockingPredicate<F>
where
    F: Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
        + Send
        + Sync
        + 'static,
{
    fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> impl Future<Output = Result<bool, PredicateError>> + Send {
        let f = Arc::clone(&self.0);
        let (principal, args) = (principal.clone(), args.clone());
        let handle = tokio::task::spawn_blocking(move || f(&principal, &args));
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(PredicateError::lookup(format!("blocking predicate failed: {e}"))),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Type erasure
// ---------------------------------------------------------------------------

/// Object-safe twin of [`Predicate`].
///
/// `Predicate::evaluate` returns `impl Future`, which can't be called
/// through `dyn`. Every `Predicate` gets this trait for free, boxing its
/// future, so the registry can hold different predicate types in one map.
trait ErasedPredicate: Send + Sync {
    fn evaluate_boxed<'a>(
        &'a self,
        principal: &'a Principal,
        args: &'a ResolvedArguments,
    ) -> BoxFuture<'a, Result<bool, PredicateError>>;
}

impl<P: Predicate> ErasedPredicate for P {
    fn evaluate_boxed<'a>(
        &'a self,
        principal: &'a Principal,
        args: &'a ResolvedArguments,
    ) -> BoxFuture<'a, Result<bool, PredicateError>> {
        self.evaluate(principal, args).boxed()
    }
}

/// A predicate as stored in the registry: its name plus the erased
/// implementation.
pub struct RegisteredPredicate {
    name: String,
    inner: Box<dyn ErasedPredicate>,
}

impl RegisteredPredicate {
    pub(crate) fn new<P: Predicate>(name: String, predicate: P) -> Self {
        Self {
            name,
            inner: Box::new(predicate),
        }
    }

    /// The name this predicate was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the predicate.
    pub async fn evaluate(
        &self,
        principal: &Principal,
        args: &ResolvedArguments,
    ) -> Result<bool, PredicateError> {
        self.inner.evaluate_boxed(principal, args).await
    }
}

impl fmt::Debug for RegisteredPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
