//! # Entity Kinds
//!
//! The store accepts exactly four record kinds. [`Entity`] is the closed
//! union the store keeps internally and hands to the pipeline; [`Record`]
//! lets callers stay typed (`store.get::<Player>(id)`).

use std::fmt;

use goban_model::{Board, EntityId, Game, GameStatus, ModelResult, Player, Room};
use serde::Serialize;

/// Classification used for identity counters and collection membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum EntityKind {
    /// [`Player`] records.
    Player = 0,
    /// [`Room`] records.
    Room = 1,
    /// [`Board`] records.
    Board = 2,
    /// [`Game`] records.
    Game = 3,
}

impl EntityKind {
    /// Number of kinds.
    pub const COUNT: usize = 4;

    /// Every kind, in collection order.
    pub const ALL: [Self; Self::COUNT] = [Self::Player, Self::Room, Self::Board, Self::Game];

    /// Returns the collection slot for this kind.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the plural collection name (`"players"`, ...).
    #[must_use]
    pub const fn collection_name(self) -> &'static str {
        match self {
            Self::Player => "players",
            Self::Room => "rooms",
            Self::Board => "boards",
            Self::Game => "games",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Room => "room",
            Self::Board => "board",
            Self::Game => "game",
        };
        f.write_str(name)
    }
}

/// Any record the store can hold.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Entity {
    /// A player.
    Player(Player),
    /// A room.
    Room(Room),
    /// A board.
    Board(Board),
    /// A game.
    Game(Game),
}

impl Entity {
    /// Returns the kind tag.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Player(_) => EntityKind::Player,
            Self::Room(_) => EntityKind::Room,
            Self::Board(_) => EntityKind::Board,
            Self::Game(_) => EntityKind::Game,
        }
    }

    /// Returns the identity. Unassigned until inserted.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Player(p) => p.id(),
            Self::Room(r) => r.id(),
            Self::Board(b) => b.id(),
            Self::Game(g) => g.id(),
        }
    }

    /// Writes the identity into the wrapped record.
    pub fn assign_id(&mut self, id: EntityId) {
        match self {
            Self::Player(p) => p.set_id(id),
            Self::Room(r) => r.set_id(id),
            Self::Board(b) => b.set_id(id),
            Self::Game(g) => g.set_id(id),
        }
    }
}

/// A concrete record type that maps onto one [`EntityKind`].
pub trait Record: Clone + Send + Sync + 'static {
    /// The kind this type is stored under.
    const KIND: EntityKind;

    /// Returns the identity.
    fn id(&self) -> EntityId;

    /// Writes the identity.
    fn assign_id(&mut self, id: EntityId);

    /// Wraps the record.
    fn into_entity(self) -> Entity;

    /// Borrows the record back out of an entity of the same kind.
    fn from_entity(entity: &Entity) -> Option<&Self>;
}

macro_rules! impl_record {
    ($ty:ident) => {
        impl Record for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            #[inline]
            fn id(&self) -> EntityId {
                $ty::id(self)
            }

            #[inline]
            fn assign_id(&mut self, id: EntityId) {
                self.set_id(id);
            }

            #[inline]
            fn into_entity(self) -> Entity {
                Entity::$ty(self)
            }

            #[inline]
            fn from_entity(entity: &Entity) -> Option<&Self> {
                match entity {
                    Entity::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Entity {
            fn from(record: $ty) -> Self {
                Entity::$ty(record)
            }
        }
    };
}

impl_record!(Player);
impl_record!(Room);
impl_record!(Board);
impl_record!(Game);

/// Field changes accepted by [`EntityStore::update_by_id`](crate::EntityStore::update_by_id).
///
/// The variant names the kind being updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityUpdate {
    /// Rename a player.
    PlayerName(String),
    /// Change a room's join code.
    RoomCode(String),
    /// Resize a board (overlapping cells are kept).
    BoardSize(usize),
    /// End a game. Goes through [`Game::conclude`].
    GameStatus(GameStatus),
}

impl EntityUpdate {
    /// Returns the kind this update targets.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::PlayerName(_) => EntityKind::Player,
            Self::RoomCode(_) => EntityKind::Room,
            Self::BoardSize(_) => EntityKind::Board,
            Self::GameStatus(_) => EntityKind::Game,
        }
    }

    /// Applies the change. Leaves the entity untouched on error.
    ///
    /// Returns `Ok(false)` if the entity is of a different kind.
    pub(crate) fn apply(&self, entity: &mut Entity) -> ModelResult<bool> {
        match (self, entity) {
            (Self::PlayerName(name), Entity::Player(p)) => p.set_name(name.clone()),
            (Self::RoomCode(code), Entity::Room(r)) => r.set_code(code.clone()),
            (Self::BoardSize(size), Entity::Board(b)) => b.resize(*size)?,
            (Self::GameStatus(status), Entity::Game(g)) => g.conclude(*status)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
