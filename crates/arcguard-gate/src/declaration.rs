//! Operation signatures and the predicate declarations attached to them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OperationSignature
// ---------------------------------------------------------------------------

/// The shape of a guarded operation: its name and ordered formal parameters.
///
/// The formal parameter names are what declarations refer to. A call's
/// `i`-th actual argument is bound to `params[i]`.
///
/// An operation may belong to a `service`: the group a type-level
/// declaration attaches to (one controller, one API surface).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSignature {
    /// Unique operation name, e.g. `"players.save_roles"`.
    pub name: String,

    /// The service this operation belongs to, if any.
    #[serde(default)]
    pub service: Option<String>,

    /// Formal parameter names in positional order.
    #[serde(default)]
    pub params: Vec<String>,
}

impl OperationSignature {
    /// Creates a signature with the given formal parameters.
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            service: None,
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Places this operation in a service.
    pub fn in_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// The formal position of `param`, if the operation has it.
    pub fn position_of(&self, param: &str) -> Option<usize> {
        self.params.iter().position(|p| p == param)
    }
}

// ---------------------------------------------------------------------------
// PredicateDeclaration
// ---------------------------------------------------------------------------

/// "This operation requires `predicate(param, param, ...)`."
///
/// Immutable once declared. Serialized as
/// `{ "predicate": "isMyPlayer", "params": ["gameId", "playerId"] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDeclaration {
    /// Name of a predicate in the registry.
    #[serde(rename = "predicate")]
    pub predicate_name: String,

    /// Names of the operation's formal parameters handed to the predicate.
    #[serde(rename = "params", default)]
    pub parameter_names: Vec<String>,
}

impl PredicateDeclaration {
    /// Creates a declaration.
    pub fn new<I, S>(predicate_name: impl Into<String>, parameter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            predicate_name: predicate_name.into(),
            parameter_names: parameter_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Renders as the expression it stands for: `isMyPlayer(gameId, playerId)`.
impl fmt::Display for PredicateDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.predicate_name, self.parameter_names.join(", "))
    }
}

// ---------------------------------------------------------------------------
// BoundDeclaration
// ---------------------------------------------------------------------------

/// A declaration validated against one operation's signature.
///
/// Produced by [`ParameterResolver::bind`](crate::ParameterResolver::bind)
/// at startup. `positions[i]` is the formal position of
/// `declaration.parameter_names[i]`, so resolving a call is a plain index
/// projection with no name matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDeclaration {
    pub(crate) operation: String,
    pub(crate) declaration: PredicateDeclaration,
    pub(crate) positions: Vec<usize>,
}

impl BoundDeclaration {
    /// The operation this declaration was bound to.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The underlying declaration.
    pub fn declaration(&self) -> &PredicateDeclaration {
        &self.declaration
    }

    /// Formal positions, parallel to `declaration().parameter_names`.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Re-targets the binding at another operation with the same signature.
    /// Used for variants inheriting a declaration.
    pub(crate) fn for_operation(&self, operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_finds_formal_parameter() {
        let sig = OperationSignature::new("players.save_roles", ["gameId", "playerId", "roles"]);
        assert_eq!(sig.position_of("playerId"), Some(1));
        assert_eq!(sig.position_of("userId"), None);
    }

    #[test]
    fn test_declaration_display_reads_like_expression() {
        let decl = PredicateDeclaration::new("isMyPlayer", ["gameId", "playerId"]);
        assert_eq!(decl.to_string(), "isMyPlayer(gameId, playerId)");
    }

    #[test]
    fn test_declaration_json_format() {
        let decl: PredicateDeclaration =
            serde_json::from_str(r#"{ "predicate": "isMyGame", "params": ["gameId"] }"#)
                .unwrap();
        assert_eq!(decl, PredicateDeclaration::new("isMyGame", ["gameId"]));
    }

    #[test]
    fn test_signature_json_defaults_service_and_params() {
        let sig: OperationSignature = serde_json::from_str(r#"{ "name": "games.list" }"#).unwrap();
        assert_eq!(sig.service, None);
        assert!(sig.params.is_empty());
    }
}
