//! Error types for the registry layer.

/// Errors raised while registering or looking up predicates.
///
/// Both are configuration defects. They surface at startup, when the guard
/// validates its declarations, never in the middle of serving calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No predicate is registered under this name.
    #[error("unknown predicate `{0}`")]
    UnknownPredicate(String),

    /// A predicate with this name is already registered.
    #[error("predicate `{0}` is already registered")]
    DuplicatePredicate(String),
}

/// A failure inside a predicate's own evaluation.
///
/// The gate never lets these escape: a predicate that fails is a denied
/// call, and the error is kept as the deny reason for diagnostics.
///
/// `Clone + PartialEq` so decisions carrying them can be compared in tests
/// and logged more than once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    /// An entity the predicate needed doesn't exist (e.g., the game).
    #[error("{entity} {id} not found")]
    EntityNotFound {
        /// Kind of entity ("game", "player", ...).
        entity: &'static str,
        /// The identifier that was looked up, as displayed.
        id: String,
    },

    /// A resolved argument is missing or can't be read as the expected type.
    #[error("argument `{0}` is missing or malformed")]
    InvalidArgument(String),

    /// The backing store failed (I/O, timeout in the store client, ...).
    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl PredicateError {
    /// Shorthand for [`PredicateError::EntityNotFound`].
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::EntityNotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`PredicateError::InvalidArgument`].
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument(name.into())
    }

    /// Wraps any store error as [`PredicateError::Lookup`].
    pub fn lookup(err: impl std::fmt::Display) -> Self {
        Self::Lookup(err.to_string())
    }
}
