//! Binding declared parameter names to a call's actual arguments.
//!
//! Resolution happens in two steps:
//!
//! 1. **bind** (once, at startup) — match every declared name against the
//!    operation's formal parameters and remember its position. A name that
//!    doesn't exist fails here, before any call is served.
//! 2. **resolve** (every call) — pick the remembered positions out of the
//!    call's actual arguments.

use arcguard_protocol::{CallArguments, ResolvedArguments};

use crate::{BoundDeclaration, OperationSignature, PredicateDeclaration, ResolveError};

/// Stateless resolver. No side effects; purely a lookup/projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterResolver;

impl ParameterResolver {
    /// Validates `declaration` against `signature` and precomputes the
    /// position of each declared parameter.
    ///
    /// # Errors
    /// [`ResolveError::ParameterNotFound`] for the first declared name the
    /// signature doesn't have.
    pub fn bind(
        signature: &OperationSignature,
        declaration: &PredicateDeclaration,
    ) -> Result<BoundDeclaration, ResolveError> {
        let positions = declaration
            .parameter_names
            .iter()
            .map(|name| {
                signature
                    .position_of(name)
                    .ok_or_else(|| ResolveError::ParameterNotFound {
                        operation: signature.name.clone(),
                        parameter: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BoundDeclaration {
            operation: signature.name.clone(),
            declaration: declaration.clone(),
            positions,
        })
    }

    /// Projects the bound parameters out of one call's arguments.
    ///
    /// # Errors
    /// [`ResolveError::MissingArgument`] when the call is shorter than a
    /// bound position.
    pub fn resolve(
        bound: &BoundDeclaration,
        args: &CallArguments,
    ) -> Result<ResolvedArguments, ResolveError> {
        let mut resolved = ResolvedArguments::new();
        for (name, &position) in bound
            .declaration
            .parameter_names
            .iter()
            .zip(bound.positions.iter())
        {
            let value = args.get(position).ok_or_else(|| ResolveError::MissingArgument {
                parameter: name.clone(),
                position,
            })?;
            resolved.insert(name.clone(), value.clone());
        }
        Ok(resolved)
    }

    /// Binds and resolves in one step, for callers without a prepared
    /// [`BoundDeclaration`].
    ///
    /// # Errors
    /// Either [`ResolveError`] variant.
    pub fn resolve_names<I, S>(
        signature: &OperationSignature,
        args: &CallArguments,
        names: I,
    ) -> Result<ResolvedArguments, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // The predicate name is irrelevant for resolution.
        let declaration = PredicateDeclaration::new(String::new(), names);
        let bound = Self::bind(signature, &declaration)?;
        Self::resolve(&bound, args)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arcguard_protocol::{ArgValue, GameId, PlayerId};

    fn save_roles() -> OperationSignature {
        OperationSignature::new("players.save_roles", ["gameId", "playerId", "roles"])
    }

    fn is_my_player() -> PredicateDeclaration {
        PredicateDeclaration::new("isMyPlayer", ["gameId", "playerId"])
    }

    // =====================================================================
    // bind()
    // =====================================================================

    #[test]
    fn test_bind_records_formal_positions() {
        let bound = ParameterResolver::bind(&save_roles(), &is_my_player()).unwrap();

        assert_eq!(bound.positions(), &[0, 1]);
        assert_eq!(bound.operation(), "players.save_roles");
    }

    #[test]
    fn test_bind_follows_declaration_order_not_signature_order() {
        let decl = PredicateDeclaration::new("isMyPlayer", ["playerId", "gameId"]);

        let bound = ParameterResolver::bind(&save_roles(), &decl).unwrap();

        assert_eq!(bound.positions(), &[1, 0]);
    }

    #[test]
    fn test_bind_unknown_name_returns_parameter_not_found() {
        let sig = OperationSignature::new("games.add_vote", Vec::<String>::new());

        let result = ParameterResolver::bind(&sig, &is_my_player());

        assert_eq!(
            result,
            Err(ResolveError::ParameterNotFound {
                operation: "games.add_vote".into(),
                parameter: "gameId".into(),
            })
        );
    }

    // =====================================================================
    // resolve()
    // =====================================================================

    #[test]
    fn test_resolve_projects_named_values() {
        let bound = ParameterResolver::bind(&save_roles(), &is_my_player()).unwrap();
        let args = CallArguments::new()
            .arg(GameId(1))
            .arg(PlayerId(7))
            .arg(vec!["ECHO"]);

        let resolved = ParameterResolver::resolve(&bound, &args).unwrap();

        assert_eq!(resolved.len(), 2, "only declared names are projected");
        assert_eq!(resolved.game_id("gameId"), Some(GameId(1)));
        assert_eq!(resolved.player_id("playerId"), Some(PlayerId(7)));
        assert!(!resolved.contains("roles"));
    }

    #[test]
    fn test_resolve_short_call_returns_missing_argument() {
        let bound = ParameterResolver::bind(&save_roles(), &is_my_player()).unwrap();
        let args = CallArguments::new().arg(GameId(1));

        let result = ParameterResolver::resolve(&bound, &args);

        assert_eq!(
            result,
            Err(ResolveError::MissingArgument {
                parameter: "playerId".into(),
                position: 1,
            })
        );
    }

    #[test]
    fn test_resolve_passes_values_through_untouched() {
        // Resolution doesn't interpret values: a malformed id is the
        // predicate's problem, not the resolver's.
        let bound = ParameterResolver::bind(&save_roles(), &is_my_player()).unwrap();
        let args = CallArguments::new().arg("not-a-number").arg(PlayerId(7));

        let resolved = ParameterResolver::resolve(&bound, &args).unwrap();

        assert_eq!(resolved.get("gameId"), Some(&ArgValue::Text("not-a-number".into())));
    }

    // =====================================================================
    // resolve_names()
    // =====================================================================

    #[test]
    fn test_resolve_names_binds_and_projects() {
        let args = CallArguments::new().arg(GameId(3)).arg(PlayerId(4));

        let resolved =
            ParameterResolver::resolve_names(&save_roles(), &args, ["playerId"]).unwrap();

        assert_eq!(resolved.player_id("playerId"), Some(PlayerId(4)));
    }

    #[test]
    fn test_resolve_names_unknown_name_fails() {
        let args = CallArguments::new();

        let result = ParameterResolver::resolve_names(&save_roles(), &args, ["userId"]);

        assert!(matches!(result, Err(ResolveError::ParameterNotFound { .. })));
    }
}
