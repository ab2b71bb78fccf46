//! Caller identity for Arcguard.
//!
//! This crate answers one question for the layers above it: *who is making
//! this call?*
//!
//! 1. **Authentication** — turning a token into a [`Principal`]
//!    ([`Authenticator`] trait)
//! 2. **Request context** — carrying that principal (or its absence)
//!    through one call ([`PrincipalContext`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Gate (above)  ← evaluates predicates against the principal
//!     ↕
//! Session Layer (this crate)  ← knows who the caller is
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId
//! ```
//!
//! Identity is passed explicitly. Nothing here is stored in thread-locals
//! or globals, so a gate can be exercised in tests by building a context
//! by hand.

#![allow(async_fn_in_trait)]

mod auth;
mod context;
mod error;
mod principal;

pub use auth::Authenticator;
pub use context::PrincipalContext;
pub use error::SessionError;
pub use principal::Principal;
