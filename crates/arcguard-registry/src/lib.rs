//! Authorization predicates and the registry that names them.
//!
//! A predicate is a boolean function of the caller and the call's resolved
//! arguments, e.g. `isMyPlayer(gameId, playerId)`. This crate provides:
//!
//! - [`Predicate`] — the trait predicate implementations satisfy (sync or
//!   async)
//! - [`FnPredicate`] — adapter for plain synchronous closures that never
//!   block
//! - [`BlockingPredicate`] — adapter for closures that do blocking I/O,
//!   run on tokio's blocking pool
//! - [`PredicateRegistry`] — name → predicate map, filled at startup and
//!   read-only afterwards
//!
//! # Concurrency
//!
//! The registry has no interior mutability. It is filled through `&mut self`
//! during startup, then moved into an `Arc` and shared. From that point
//! nothing can mutate it, so lookups from any number of tasks need no lock.

#![allow(async_fn_in_trait)]

mod error;
mod predicate;
mod registry;

pub use error::{PredicateError, RegistryError};
pub use predicate::{BlockingPredicate, FnPredicate, Predicate, RegisteredPredicate};
pub use registry::PredicateRegistry;
