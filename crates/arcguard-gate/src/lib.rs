//! The authorization gate for Arcguard.
//!
//! Given an operation that declares a predicate (say
//! `isMyPlayer(gameId, playerId)`), the gate decides whether the current caller
//! may proceed, before the operation body runs.
//!
//! # Key types
//!
//! - [`OperationSignature`] / [`PredicateDeclaration`] — what an operation
//!   looks like and which check guards it
//! - [`ParameterResolver`] — binds declared names to argument positions
//!   once, then projects them out of every call
//! - [`OperationTable`] — every operation's effective declaration,
//!   validated at startup (inheritance and service-level declarations
//!   included)
//! - [`AuthorizationGate`] — resolve → look up → evaluate → allow/deny
//! - [`CallState`] — the per-call state machine
//!
//! # Fail closed
//!
//! Every per-call problem (anonymous caller, missing argument, predicate
//! error, timeout) ends in a denial. Only startup validation returns errors
//! that abort the process.

mod config;
mod decision;
mod declaration;
mod error;
mod gate;
mod resolver;
mod state;
mod table;

pub use config::GateConfig;
pub use decision::{AuthorizationDecision, CallOutcome, DenyReason};
pub use declaration::{BoundDeclaration, OperationSignature, PredicateDeclaration};
pub use error::{GateError, ResolveError};
pub use gate::AuthorizationGate;
pub use resolver::ParameterResolver;
pub use state::CallState;
pub use table::{OperationEntry, OperationTable, OperationTableBuilder};
