//! # GOBAN Model
//!
//! Domain records for a small two-player board game.
//!
//! ## Design Principles
//!
//! 1. **Turn tracking, not rules** - a [`Game`] knows whose turn it is and how
//!    it ended, never whether a move is legal
//! 2. **Two seats per room** - a [`Room`] holds at most two players, slot 0 plays
//!    Black and slot 1 plays White
//! 3. **Falsy results are the contract** - seat, lookup and removal operations
//!    answer with `bool`/`Option`; "not found" and "refused" are the same answer
//!
//! Only construction with bad arguments (and the validated [`Game::conclude`]
//! transition) produce a [`ModelError`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use goban_model::{CellState, Player, Room};
//!
//! let mut room = Room::new("room123");
//! let alice = Arc::new(Player::new("alice"));
//! let bob = Arc::new(Player::new("bob"));
//!
//! assert!(room.add_player(Arc::clone(&alice)));
//! assert!(room.add_player(Arc::clone(&bob)));
//! assert!(room.is_full());
//!
//! let current = room.current_player().unwrap();
//! assert_eq!(current.name(), "alice");
//! assert_eq!(room.game().unwrap().current_turn(), CellState::Black);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod board;
pub mod error;
pub mod game;
pub mod id;
pub mod player;
pub mod room;

pub use board::{Board, CellState};
pub use error::{ModelError, ModelResult};
pub use game::{Game, GameOptions, GameStatus, DEFAULT_BOARD_SIZE};
pub use id::EntityId;
pub use player::{Player, PlayerRef};
pub use room::{Room, SLOT_COUNT};
