//! Shared data types for Arcguard.
//!
//! This crate defines the values that flow through every layer:
//!
//! - **Identifiers** ([`PlayerId`], [`GameId`]) — what guarded calls talk about.
//! - **Arguments** ([`ArgValue`], [`CallArguments`], [`ResolvedArguments`]) —
//!   the actual arguments of a call, and the named subset a predicate sees.
//! - **Rejection** ([`AccessDenied`]) — what a denied caller receives.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how manifests and
//!   arguments are decoded from bytes.
//!
//! # Architecture
//!
//! ```text
//! Protocol (this crate) → Session (principal) → Registry (predicates) → Gate
//! ```
//!
//! The protocol layer doesn't know about principals or predicates; it only
//! knows how to represent and decode values.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ACCESS_DENIED_CODE, AccessDenied, ArgValue, CallArguments, GameId, PlayerId,
    ResolvedArguments,
};
