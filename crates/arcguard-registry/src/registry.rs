//! The predicate registry: name → predicate, fixed at startup.

use std::collections::HashMap;
use std::fmt;

use arcguard_protocol::ResolvedArguments;
use arcguard_session::Principal;

use crate::{
    BlockingPredicate, FnPredicate, Predicate, PredicateError, RegisteredPredicate, RegistryError,
};

/// Maps predicate names (e.g. `"isMyPlayer"`) to their implementations.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ register() × N ──→ Arc::new(registry) ──→ lookup() × ∞
///          (startup, &mut)      (frozen)              (any task, no lock)
/// ```
///
/// ## Duplicate names
///
/// Registering a name twice is always an error
/// ([`RegistryError::DuplicatePredicate`]). Two modules silently fighting
/// over `isMyPlayer` is exactly the kind of bug that turns into a bypass,
/// so the registry never overwrites.
#[derive(Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, RegisteredPredicate>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `predicate` under `name`.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicatePredicate`] if the name is taken.
    /// The existing predicate is kept.
    pub fn register<P: Predicate>(
        &mut self,
        name: impl Into<String>,
        predicate: P,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.predicates.contains_key(&name) {
            tracing::warn!(predicate = %name, "duplicate predicate registration rejected");
            return Err(RegistryError::DuplicatePredicate(name));
        }

        self.predicates
            .insert(name.clone(), RegisteredPredicate::new(name.clone(), predicate));
        tracing::info!(predicate = %name, "predicate registered");
        Ok(())
    }

    /// Registers a synchronous closure as a predicate.
    ///
    /// The closure runs inline and must not block; see [`FnPredicate`].
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, FnPredicate(f))
    }

    /// Registers a synchronous closure that may block. Each evaluation runs
    /// on tokio's blocking pool; see [`BlockingPredicate`].
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn register_blocking<F>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, BlockingPredicate::new(f))
    }

    /// Looks up a predicate by name.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownPredicate`] if nothing is registered
    /// under `name`.
    pub fn lookup(&self, name: &str) -> Result<&RegisteredPredicate, RegistryError> {
        self.predicates
            .get(name)
            .ok_or_else(|| RegistryError::UnknownPredicate(name.to_string()))
    }

    /// Returns `true` if a predicate is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// All registered names, sorted (for stable diagnostics).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.names())
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `PredicateRegistry`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.

    use super::*;
    use arcguard_protocol::PlayerId;

    fn always(value: bool) -> impl Fn(&Principal, &ResolvedArguments) -> Result<bool, PredicateError>
    + Send
    + Sync
    + 'static {
        move |_: &Principal, _: &ResolvedArguments| Ok(value)
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[test]
    fn test_register_new_name_succeeds() {
        let mut registry = PredicateRegistry::new();

        registry.register_fn("allowAll", always(true)).expect("should register");

        assert!(registry.contains("allowAll"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_name_returns_error() {
        let mut registry = PredicateRegistry::new();
        registry.register_fn("isMyPlayer", always(true)).unwrap();

        let result = registry.register_fn("isMyPlayer", always(false));

        assert_eq!(
            result,
            Err(RegistryError::DuplicatePredicate("isMyPlayer".into()))
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_keeps_original_predicate() {
        // The rejected registration must not have replaced the first one.
        let mut registry = PredicateRegistry::new();
        registry.register_fn("check", always(true)).unwrap();
        let _ = registry.register_fn("check", always(false));

        let principal = Principal::new(PlayerId(1));
        let result = registry
            .lookup("check")
            .unwrap()
            .evaluate(&principal, &ResolvedArguments::new())
            .await;

        assert_eq!(result, Ok(true));
    }

    // =====================================================================
    // lookup()
    // =====================================================================

    #[test]
    fn test_lookup_unknown_name_returns_unknown_predicate() {
        let registry = PredicateRegistry::new();

        let result = registry.lookup("isMyPlayer");

        assert!(
            matches!(result, Err(RegistryError::UnknownPredicate(ref n)) if n == "isMyPlayer")
        );
    }

    #[test]
    fn test_lookup_returns_predicate_with_its_name() {
        let mut registry = PredicateRegistry::new();
        registry.register_fn("isMyGame", always(true)).unwrap();

        let predicate = registry.lookup("isMyGame").unwrap();

        assert_eq!(predicate.name(), "isMyGame");
    }

    // =====================================================================
    // names() / len() / is_empty()
    // =====================================================================

    #[test]
    fn test_names_are_sorted() {
        let mut registry = PredicateRegistry::new();
        registry.register_fn("zeta", always(true)).unwrap();
        registry.register_fn("alpha", always(true)).unwrap();

        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_is_empty_tracks_registrations() {
        let mut registry = PredicateRegistry::new();
        assert!(registry.is_empty());

        registry.register_fn("a", always(true)).unwrap();

        assert!(!registry.is_empty());
    }
}
