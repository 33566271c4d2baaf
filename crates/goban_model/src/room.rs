//! # Room
//!
//! Two seats and the game being played in them.
//!
//! Slot 0 plays Black, slot 1 plays White. Seats are matched by handle
//! identity ([`Arc::ptr_eq`]), so two different players may share a name.
//!
//! Every seat operation answers with `bool` or `Option`. A `false`/`None`
//! does not say whether the player was missing or the room refused; callers
//! must not expect a finer distinction.

use std::sync::Arc;

use serde::Serialize;

use crate::board::CellState;
use crate::game::Game;
use crate::id::EntityId;
use crate::player::PlayerRef;

/// Number of seats in a room.
pub const SLOT_COUNT: usize = 2;

/// A room hosting at most two players.
#[derive(Clone, Debug, Serialize)]
pub struct Room {
    id: EntityId,
    code: String,
    players: [Option<PlayerRef>; SLOT_COUNT],
    game: Option<Game>,
}

impl Room {
    /// Creates a room with a fresh default game and both seats vacant.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            code: code.into(),
            players: [None, None],
            game: Some(Game::new()),
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

    /// Returns the join code.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Replaces the join code.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Returns the attached game, if any.
    #[inline]
    #[must_use]
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Returns the attached game mutably, if any.
    #[inline]
    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }

    /// Attaches a game, or detaches with `None`. Returns the previous one.
    pub fn set_game(&mut self, game: Option<Game>) -> Option<Game> {
        std::mem::replace(&mut self.game, game)
    }

    /// Returns both seats, slot 0 first.
    #[inline]
    #[must_use]
    pub fn players(&self) -> &[Option<PlayerRef>; SLOT_COUNT] {
        &self.players
    }

    /// Seats a player in the first vacant slot.
    ///
    /// Returns `false` when both slots are taken.
    pub fn add_player(&mut self, player: PlayerRef) -> bool {
        match self.players.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(player);
                true
            }
            None => false,
        }
    }

    /// Vacates the slot holding `player`.
    ///
    /// Returns `false` when `player` is not seated here.
    pub fn remove_player(&mut self, player: &PlayerRef) -> bool {
        match self.slot_of(player) {
            Some(slot) => {
                self.players[slot] = None;
                true
            }
            None => false,
        }
    }

    /// Checks if both slots are occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.iter().all(Option::is_some)
    }

    /// Checks if both slots are vacant.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.iter().all(Option::is_none)
    }

    /// Returns the player whose color is to move.
    ///
    /// `None` if no game is attached or that seat is vacant.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerRef> {
        let turn = self.game.as_ref()?.current_turn();
        self.player_by_color(turn)
    }

    /// Returns whoever sits across from `player`.
    ///
    /// `None` if `player` is not seated here or the other seat is vacant.
    #[must_use]
    pub fn opponent(&self, player: &PlayerRef) -> Option<&PlayerRef> {
        let slot = self.slot_of(player)?;
        self.players[SLOT_COUNT - 1 - slot].as_ref()
    }

    /// Returns the first seated player named `name`, slot 0 first.
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&PlayerRef> {
        self.players.iter().flatten().find(|p| p.name() == name)
    }

    /// Returns the player seated for `color`. `Empty` seats nobody.
    #[must_use]
    pub fn player_by_color(&self, color: CellState) -> Option<&PlayerRef> {
        let slot = match color {
            CellState::Black => 0,
            CellState::White => 1,
            CellState::Empty => return None,
        };
        self.players[slot].as_ref()
    }

    fn slot_of(&self, player: &PlayerRef) -> Option<usize> {
        self.players
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| Arc::ptr_eq(p, player)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn player(name: &str) -> PlayerRef {
        Arc::new(Player::new(name))
    }

    #[test]
    fn test_new_room() {
        let room = Room::new("room123");
        assert_eq!(room.code(), "room123");
        assert!(room.is_empty());
        assert!(!room.is_full());
        assert!(room.game().is_some());
        assert!(room.current_player().is_none());
    }

    #[test]
    fn test_add_player_capacity() {
        let mut room = Room::new("r");
        assert!(room.add_player(player("a")));
        assert!(!room.is_full());
        assert!(room.add_player(player("b")));
        assert!(room.is_full());
        assert!(!room.add_player(player("c")));

        assert_eq!(room.players()[0].as_ref().unwrap().name(), "a");
        assert_eq!(room.players()[1].as_ref().unwrap().name(), "b");
    }

    #[test]
    fn test_remove_player() {
        let mut room = Room::new("r");
        let a = player("a");
        let b = player("b");
        room.add_player(Arc::clone(&a));
        room.add_player(Arc::clone(&b));

        let stranger = player("a");
        assert!(!room.remove_player(&stranger));
        assert!(room.is_full());

        assert!(room.remove_player(&a));
        assert!(room.players()[0].is_none());
        assert!(!room.remove_player(&a));

        // Freed slot 0 is reused first.
        let c = player("c");
        assert!(room.add_player(Arc::clone(&c)));
        assert!(Arc::ptr_eq(room.players()[0].as_ref().unwrap(), &c));
    }

    #[test]
    fn test_current_player_follows_turn() {
        let mut room = Room::new("r");
        let a = player("a");
        let b = player("b");
        room.add_player(Arc::clone(&a));
        room.add_player(Arc::clone(&b));

        assert!(Arc::ptr_eq(room.current_player().unwrap(), &a));
        room.game_mut().unwrap().switch_turn();
        assert!(Arc::ptr_eq(room.current_player().unwrap(), &b));

        room.set_game(None);
        assert!(room.current_player().is_none());
    }

    #[test]
    fn test_current_player_vacant_seat() {
        let mut room = Room::new("r");
        room.add_player(player("a"));
        room.game_mut().unwrap().switch_turn();
        assert!(room.current_player().is_none());
    }

    #[test]
    fn test_opponent() {
        let mut room = Room::new("r");
        let a = player("a");
        let b = player("b");
        room.add_player(Arc::clone(&a));
        assert!(room.opponent(&a).is_none());

        room.add_player(Arc::clone(&b));
        assert!(Arc::ptr_eq(room.opponent(&a).unwrap(), &b));
        assert!(Arc::ptr_eq(room.opponent(&b).unwrap(), &a));
        assert!(room.opponent(&player("x")).is_none());
    }

    #[test]
    fn test_lookup_by_name_and_color() {
        let mut room = Room::new("r");
        let first = player("twin");
        let second = player("twin");
        room.add_player(Arc::clone(&first));
        room.add_player(Arc::clone(&second));

        assert!(Arc::ptr_eq(room.player_by_name("twin").unwrap(), &first));
        assert!(room.player_by_name("nobody").is_none());

        assert!(Arc::ptr_eq(room.player_by_color(CellState::Black).unwrap(), &first));
        assert!(Arc::ptr_eq(room.player_by_color(CellState::White).unwrap(), &second));
        assert!(room.player_by_color(CellState::Empty).is_none());
    }
}
