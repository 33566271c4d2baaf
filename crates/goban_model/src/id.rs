//! # Entity Identity
//!
//! Identities are assigned by the store at insertion time, per kind,
//! starting at 1. A record that was never inserted carries
//! [`EntityId::UNASSIGNED`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-kind identity of a stored record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Identity of a record that has not been inserted yet.
    pub const UNASSIGNED: Self = Self(0);

    /// First identity handed out for every kind.
    pub const FIRST: Self = Self(1);

    /// Wraps a raw identity value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Checks if this identity has been assigned by a store.
    #[inline]
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// Returns the identity following this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_default() {
        assert_eq!(EntityId::default(), EntityId::UNASSIGNED);
        assert!(!EntityId::UNASSIGNED.is_assigned());
        assert!(EntityId::FIRST.is_assigned());
    }

    #[test]
    fn test_next_is_monotonic() {
        let id = EntityId::FIRST.next().next();
        assert_eq!(id.get(), 3);
        assert!(id > EntityId::FIRST);
    }
}
