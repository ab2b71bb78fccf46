//! JSON manifests: operations and their declarations as data.
//!
//! ```json
//! {
//!   "version": 1,
//!   "config": { "evaluation_timeout_ms": 2000 },
//!   "operations": [
//!     { "name": "players.save_roles", "service": "players",
//!       "params": ["gameId", "playerId", "roles"],
//!       "guard": { "predicate": "isMyPlayer", "params": ["gameId", "playerId"] } }
//!   ],
//!   "services": [
//!     { "name": "games", "guard": { "predicate": "isMyGame", "params": ["gameId"] } }
//!   ],
//!   "variants": [
//!     { "name": "players.save_roles_v2", "implements": "players.save_roles" }
//!   ]
//! }
//! ```
//!
//! Predicates are code and are never part of a manifest.

use arcguard_gate::{GateConfig, OperationSignature, PredicateDeclaration};
use arcguard_protocol::{Codec, JsonCodec, ProtocolError};
use serde::{Deserialize, Serialize};

/// The manifest format version this build understands.
pub const MANIFEST_VERSION: u32 = 1;

/// A decoded manifest. Apply it with
/// [`GuardBuilder::manifest`](crate::GuardBuilder::manifest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardManifest {
    pub version: u32,

    #[serde(default)]
    pub config: GateConfig,

    #[serde(default)]
    pub operations: Vec<OperationManifest>,

    #[serde(default)]
    pub services: Vec<ServiceManifest>,

    #[serde(default)]
    pub variants: Vec<VariantManifest>,
}

/// One operation, optionally with its own declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationManifest {
    #[serde(flatten)]
    pub signature: OperationSignature,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<PredicateDeclaration>,
}

/// A service-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceManifest {
    pub name: String,
    pub guard: PredicateDeclaration,
}

/// A variant inheriting another operation's signature and declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantManifest {
    pub name: String,
    pub implements: String,
}

impl GuardManifest {
    /// Decodes a manifest from JSON bytes.
    ///
    /// # Errors
    /// [`ProtocolError::Decode`] for malformed JSON and
    /// [`ProtocolError::InvalidMessage`] for a version other than
    /// [`MANIFEST_VERSION`].
    pub fn from_json(data: &[u8]) -> Result<Self, ProtocolError> {
        Self::decode_with(&JsonCodec, data)
    }

    /// Decodes a manifest with any [`Codec`].
    ///
    /// # Errors
    /// Same as [`from_json`](Self::from_json).
    pub fn decode_with<C: Codec>(codec: &C, data: &[u8]) -> Result<Self, ProtocolError> {
        let manifest: Self = codec.decode(data)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ProtocolError::InvalidMessage(format!(
                "manifest version {} (expected {MANIFEST_VERSION})",
                manifest.version
            )));
        }
        tracing::debug!(
            operations = manifest.operations.len(),
            services = manifest.services.len(),
            variants = manifest.variants.len(),
            "manifest decoded"
        );
        Ok(manifest)
    }
}
