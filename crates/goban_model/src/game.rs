//! # Game
//!
//! A board plus whose turn it is and how the game ended.
//!
//! ## Status Machine
//!
//! ```text
//!                 ┌──> BlackWon
//!   NotDecided ───┼──> WhiteWon
//!                 └──> Draw
//! ```
//!
//! Once the status is terminal the turn is frozen: [`Game::switch_turn`]
//! refuses to run. [`Game::set_status`] is the raw setter and accepts any
//! value; [`Game::conclude`] is the validated path that only allows the
//! arrows above.

use serde::Serialize;

use crate::board::{Board, CellState};
use crate::error::{ModelError, ModelResult};
use crate::id::EntityId;

/// Board side length used when no size option is given.
pub const DEFAULT_BOARD_SIZE: usize = Board::STANDARD_SIZE;

/// Outcome of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum GameStatus {
    /// Still being played.
    #[default]
    NotDecided = 0,
    /// Black won.
    BlackWon = 1,
    /// White won.
    WhiteWon = 2,
    /// Nobody won.
    Draw = 3,
}

impl GameStatus {
    /// Checks if this status ends the game.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::NotDecided)
    }
}

/// Construction options for [`Game`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameOptions {
    /// Board side length. `None` means [`DEFAULT_BOARD_SIZE`].
    pub size: Option<usize>,
}

impl GameOptions {
    /// Creates options with every field defaulted.
    #[must_use]
    pub const fn new() -> Self {
        Self { size: None }
    }

    /// Sets the board side length.
    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

/// A single game between Black and White.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Game {
    id: EntityId,
    board: Board,
    current_turn: CellState,
    status: GameStatus,
}

impl Game {
    /// Creates a game on a [`DEFAULT_BOARD_SIZE`] board, Black to move.
    #[must_use]
    pub fn new() -> Self {
        Self::on_board(Self::default_board())
    }

    /// Creates a game from options.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if the requested size is zero.
    pub fn with_options(options: GameOptions) -> ModelResult<Self> {
        let board = match options.size {
            Some(size) => Board::new(size)?,
            None => Self::default_board(),
        };
        Ok(Self::on_board(board))
    }

    /// Creates a game on a `size` x `size` board.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `size` is zero.
    pub fn with_size(size: usize) -> ModelResult<Self> {
        Self::with_options(GameOptions::new().size(size))
    }

    /// Creates a game around an existing board.
    #[must_use]
    pub fn on_board(board: Board) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            board,
            current_turn: CellState::Black,
            status: GameStatus::NotDecided,
        }
    }

    fn default_board() -> Board {
        Board::default()
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

    /// Returns the board.
    #[inline]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the board mutably.
    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Returns the color to move. Never `Empty`.
    #[inline]
    #[must_use]
    pub const fn current_turn(&self) -> CellState {
        self.current_turn
    }

    /// Checks if `color` is to move.
    #[inline]
    #[must_use]
    pub fn is_current_turn(&self, color: CellState) -> bool {
        self.current_turn == color
    }

    /// Checks if Black is to move.
    #[inline]
    #[must_use]
    pub fn is_current_turn_black(&self) -> bool {
        self.is_current_turn(CellState::Black)
    }

    /// Checks if White is to move.
    #[inline]
    #[must_use]
    pub fn is_current_turn_white(&self) -> bool {
        self.is_current_turn(CellState::White)
    }

    /// Hands the move to the other color.
    ///
    /// Returns `false` and leaves the turn untouched if the game is over.
    pub fn switch_turn(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        self.current_turn = self.current_turn.opponent();
        true
    }

    /// Returns the status.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Overwrites the status without any transition check.
    #[inline]
    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Ends the game with a terminal status.
    ///
    /// # Errors
    ///
    /// - [`ModelError::GameOver`] if the game already ended
    /// - [`ModelError::InvalidTransition`] if `status` is `NotDecided`
    pub fn conclude(&mut self, status: GameStatus) -> ModelResult<()> {
        if self.is_over() {
            return Err(ModelError::GameOver { status: self.status });
        }
        if !status.is_terminal() {
            return Err(ModelError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Checks if the status is terminal.
    #[inline]
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.status.is_terminal()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let game = Game::new();
        assert_eq!(game.current_turn(), CellState::Black);
        assert_eq!(game.status(), GameStatus::NotDecided);
        assert_eq!(game.board().size(), DEFAULT_BOARD_SIZE);
        assert!(!game.is_over());
    }

    #[test]
    fn test_new_game_with_size() {
        let game = Game::with_size(7).unwrap();
        assert_eq!(game.board().size(), 7);

        let game = Game::with_options(GameOptions::new()).unwrap();
        assert_eq!(game.board().size(), DEFAULT_BOARD_SIZE);

        assert!(Game::with_size(0).is_err());
    }

    #[test]
    fn test_switch_turn_pairs_restore() {
        let mut game = Game::new();
        assert!(game.switch_turn());
        assert!(game.is_current_turn_white());
        assert!(game.switch_turn());
        assert!(game.is_current_turn_black());
    }

    #[test]
    fn test_switch_turn_frozen_after_terminal() {
        let mut game = Game::new();
        game.switch_turn();
        game.set_status(GameStatus::WhiteWon);

        assert!(game.is_over());
        assert!(!game.switch_turn());
        assert_eq!(game.current_turn(), CellState::White);
    }

    #[test]
    fn test_set_status_is_unchecked() {
        let mut game = Game::new();
        game.set_status(GameStatus::BlackWon);
        assert_eq!(game.status(), GameStatus::BlackWon);

        game.set_status(GameStatus::Draw);
        assert_eq!(game.status(), GameStatus::Draw);

        game.set_status(GameStatus::NotDecided);
        assert!(!game.is_over());
    }

    #[test]
    fn test_conclude_transitions() {
        let mut game = Game::new();
        assert_eq!(
            game.conclude(GameStatus::NotDecided),
            Err(ModelError::InvalidTransition {
                from: GameStatus::NotDecided,
                to: GameStatus::NotDecided,
            })
        );

        game.conclude(GameStatus::Draw).unwrap();
        assert_eq!(game.status(), GameStatus::Draw);

        assert_eq!(
            game.conclude(GameStatus::BlackWon),
            Err(ModelError::GameOver { status: GameStatus::Draw })
        );
    }
}
