//! Error types for the gate layer.

use arcguard_registry::RegistryError;

/// Errors raised while binding declared parameter names to arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The declaration names a parameter the operation doesn't have.
    /// Caught at startup when the declaration is bound.
    #[error("operation `{operation}` has no parameter named `{parameter}`")]
    ParameterNotFound {
        /// The guarded operation.
        operation: String,
        /// The declared name that didn't match any formal parameter.
        parameter: String,
    },

    /// The call carried fewer actual arguments than the signature promises.
    #[error("argument `{parameter}` (position {position}) missing from call")]
    MissingArgument {
        /// The declared name.
        parameter: String,
        /// Its formal position.
        position: usize,
    },
}

/// Errors raised by the gate and by operation-table validation.
///
/// `Clone + PartialEq` because a [`CallOutcome::Failed`](crate::CallOutcome)
/// carries one and outcomes are compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// Unknown or duplicate predicate.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A declared parameter couldn't be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// No operation (or variant) is registered under this name.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// An operation or variant with this name already exists.
    #[error("operation `{0}` is already registered")]
    DuplicateOperation(String),

    /// An operation or service was given a second declaration.
    #[error("`{0}` already has a declaration")]
    DuplicateDeclaration(String),

    /// A service-level declaration names a service no operation belongs to.
    #[error("unknown service `{0}`")]
    UnknownService(String),
}
