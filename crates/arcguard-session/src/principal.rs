//! The identity of the party making a call.

use std::fmt;

use arcguard_protocol::PlayerId;
use serde::{Deserialize, Serialize};

/// Who is making the current call.
///
/// Created once per request by the [`Authenticator`](crate::Authenticator)
/// and only read afterwards. Predicates receive it by reference; they never
/// own or modify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The player this caller acts as.
    pub player_id: PlayerId,

    /// Optional human-readable name (an e-mail, a nickname). Used for
    /// logging only; never consulted by authorization.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Principal {
    /// Creates a principal for the given player, without a display name.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            display_name: None,
        }
    }

    /// Attaches a display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns `true` if this principal acts as `player_id`.
    pub fn is_player(&self, player_id: PlayerId) -> bool {
        self.player_id == player_id
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{} ({name})", self.player_id),
            None => write!(f, "{}", self.player_id),
        }
    }
}
