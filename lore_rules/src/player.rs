//! Player identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Create a new random player ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a player ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty player ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
