//! Gate configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for an [`AuthorizationGate`](crate::AuthorizationGate).
///
/// `#[serde(default)]` lets a manifest set only the fields it cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Upper bound on one predicate evaluation, in milliseconds. A predicate
    /// that takes longer is abandoned and the call is denied.
    ///
    /// Default: 5000. Set to 0 to wait indefinitely.
    pub evaluation_timeout_ms: u64,

    /// Whether rejections sent to callers include the internal deny reason.
    ///
    /// Default: `false`. With it off, every denial reads `403 access denied`
    /// so callers can't tell a missing game from someone else's player.
    pub expose_deny_reasons: bool,
}

impl GateConfig {
    /// The evaluation timeout, or `None` when disabled.
    pub fn evaluation_timeout(&self) -> Option<Duration> {
        (self.evaluation_timeout_ms > 0).then(|| Duration::from_millis(self.evaluation_timeout_ms))
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            evaluation_timeout_ms: 5_000,
            expose_deny_reasons: false,
        }
    }
}
