//! Typed ID wrappers.
//!
//! Songs are addressed by UUID everywhere (routes, database rows, logs). The
//! newtype keeps a raw `Uuid` from being passed where a song is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
    /// Generate a new random song ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SongId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SongId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SongId> for Uuid {
    fn from(id: SongId) -> Self {
        id.0
    }
}

impl std::str::FromStr for SongId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
