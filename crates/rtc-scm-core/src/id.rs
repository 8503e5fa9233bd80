//! Repository item identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a repository item (workspace, stream, snapshot, component,
/// file or folder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new random ItemId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ItemId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a token as an item id, returning `None` when it is not UUID shaped.
    ///
    /// Tokens in path specs and component lists are either ids or names; this is
    /// how the two are told apart.
    pub fn parse_token(token: &str) -> Option<Self> {
        Uuid::parse_str(token.trim()).ok().map(Self)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ItemId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ItemId> for Uuid {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
