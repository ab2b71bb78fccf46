//! # Arcguard
//!
//! Declarative, parameterized authorization for game backends.
//!
//! An operation declares the check that guards it, for example
//! `isMyPlayer(gameId, playerId)`. Arcguard binds the declared names to the
//! operation's parameters at startup, then on every call resolves their
//! values, evaluates the named predicate against the caller, and lets the
//! operation body run only if the predicate says yes.
//!
//! ## Quick Start
//!
//! ```rust
//! use arcguard::prelude::*;
//!
//! # async fn demo() -> Result<(), ArcguardError> {
//! let guard = Guard::builder()
//!     .predicate_fn("isMyPlayer", |p: &Principal, args: &ResolvedArguments| {
//!         Ok(args.player_id("playerId") == Some(p.player_id))
//!     })
//!     .operation(OperationSignature::new(
//!         "players.save_roles",
//!         ["gameId", "playerId", "roles"],
//!     ))
//!     .declare(
//!         "players.save_roles",
//!         PredicateDeclaration::new("isMyPlayer", ["gameId", "playerId"]),
//!     )
//!     .build()?;
//!
//! let ctx = PrincipalContext::authenticated(Principal::new(PlayerId(1)));
//! let args = CallArguments::new().arg(GameId(1)).arg(PlayerId(1)).arg(vec!["ECHO"]);
//!
//! let saved = guard
//!     .call("players.save_roles", &ctx, &args, || async { "saved" })
//!     .await?;
//! assert_eq!(saved, "saved");
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Provides |
//! |---|---|
//! | `arcguard-protocol` | ids, argument values, [`AccessDenied`], codecs |
//! | `arcguard-session` | [`Principal`], [`PrincipalContext`], [`Authenticator`] |
//! | `arcguard-registry` | [`Predicate`], [`PredicateRegistry`] |
//! | `arcguard-gate` | [`ParameterResolver`], [`AuthorizationGate`], [`OperationTable`] |
//!
//! [`AccessDenied`]: arcguard_protocol::AccessDenied
//! [`Principal`]: arcguard_session::Principal
//! [`PrincipalContext`]: arcguard_session::PrincipalContext
//! [`Authenticator`]: arcguard_session::Authenticator
//! [`Predicate`]: arcguard_registry::Predicate
//! [`PredicateRegistry`]: arcguard_registry::PredicateRegistry
//! [`ParameterResolver`]: arcguard_gate::ParameterResolver
//! [`AuthorizationGate`]: arcguard_gate::AuthorizationGate
//! [`OperationTable`]: arcguard_gate::OperationTable

mod error;
mod guard;
mod manifest;
pub mod telemetry;

pub use error::ArcguardError;
pub use guard::{Guard, GuardBuilder};
pub use manifest::{
    GuardManifest, MANIFEST_VERSION, OperationManifest, ServiceManifest, VariantManifest,
};

pub use arcguard_gate as gate;
pub use arcguard_protocol as protocol;
pub use arcguard_registry as registry;
pub use arcguard_session as session;

/// Everything needed to declare, register, and check guarded operations.
pub mod prelude {
    pub use crate::{ArcguardError, Guard, GuardBuilder, GuardManifest};

    pub use arcguard_gate::{
        AuthorizationDecision, CallOutcome, DenyReason, GateConfig, GateError,
        OperationSignature, PredicateDeclaration,
    };
    pub use arcguard_protocol::{
        AccessDenied, ArgValue, CallArguments, GameId, PlayerId, ResolvedArguments,
    };
    pub use arcguard_registry::{Predicate, PredicateError, RegistryError};
    pub use arcguard_session::{Authenticator, Principal, PrincipalContext, SessionError};
}
