//! # Player

use std::sync::Arc;

use serde::Serialize;

use crate::id::EntityId;

/// Shared handle to a seated player.
///
/// Rooms compare seats by handle identity, not by name or id, so the same
/// name may sit in both slots.
pub type PlayerRef = Arc<Player>;

/// A named participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    id: EntityId,
    name: String,
}

impl Player {
    /// Creates an unstored player.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
        }
    }

    /// Returns the store identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Sets the store identity.
    #[inline]
    pub fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the player.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
