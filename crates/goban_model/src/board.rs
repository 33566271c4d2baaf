//! # Board
//!
//! A square grid of cell states.
//!
//! Cells are stored row-major in one contiguous buffer of `size * size`
//! entries. The board never interprets what a stone means; placement is
//! bounds-checked only.

use std::fmt;

use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::id::EntityId;

/// State of a single board intersection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum CellState {
    /// No stone.
    #[default]
    Empty = 0,
    /// Black stone. Black moves first.
    Black = 1,
    /// White stone.
    White = 2,
}

impl CellState {
    /// Returns the other stone color. `Empty` has no opponent.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
            Self::Empty => Self::Empty,
        }
    }

    /// Checks if this is a stone color (not `Empty`).
    #[inline]
    #[must_use]
    pub const fn is_stone(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Square game board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Identity assigned by the store.
    id: EntityId,
    /// Side length.
    size: usize,
    /// Row-major cells, `size * size` entries.
    cells: Vec<CellState>,
}

impl Board {
    /// Side length of a standard board.
    pub const STANDARD_SIZE: usize = 19;

    /// Creates a `size` x `size` board with every cell `Empty`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `size` is zero, negative,
    /// or too large to allocate `size * size` cells.
    pub fn new<S>(size: S) -> ModelResult<Self>
    where
        S: TryInto<usize> + Copy + fmt::Display,
    {
        let side = validate_size(size)?;
        Ok(Self {
            id: EntityId::UNASSIGNED,
            size: side,
            cells: empty_cells(side)?,
        })
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

    /// Returns the side length.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the state at (`row`, `col`), or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<CellState> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Writes a cell.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfBounds`] if the coordinates are off the board.
    pub fn set_cell(&mut self, row: usize, col: usize, state: CellState) -> ModelResult<()> {
        let i = self.index(row, col).ok_or(ModelError::OutOfBounds {
            row,
            col,
            size: self.size,
        })?;
        self.cells[i] = state;
        Ok(())
    }

    /// Iterates the board row by row.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks_exact(self.size)
    }

    /// Returns true if no stone is on the board.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|c| *c == CellState::Empty)
    }

    /// Changes the side length.
    ///
    /// Cells inside both the old and the new extent keep their state, new
    /// cells start `Empty`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `size` is zero, negative
    /// or too large. The board is unchanged on error.
    pub fn resize<S>(&mut self, size: S) -> ModelResult<()>
    where
        S: TryInto<usize> + Copy + fmt::Display,
    {
        let side = validate_size(size)?;
        if side == self.size {
            return Ok(());
        }

        let mut cells = empty_cells(side)?;
        let keep = side.min(self.size);
        for row in 0..keep {
            let src = row * self.size;
            let dst = row * side;
            cells[dst..dst + keep].copy_from_slice(&self.cells[src..src + keep]);
        }

        self.size = side;
        self.cells = cells;
        Ok(())
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }
}

impl Default for Board {
    /// An empty standard 19x19 board.
    fn default() -> Self {
        const SIDE: usize = Board::STANDARD_SIZE;
        Self {
            id: EntityId::UNASSIGNED,
            size: SIDE,
            cells: vec![CellState::Empty; SIDE * SIDE],
        }
    }
}

fn validate_size<S>(size: S) -> ModelResult<usize>
where
    S: TryInto<usize> + Copy + fmt::Display,
{
    match size.try_into() {
        Ok(side) if side > 0 => Ok(side),
        _ => Err(ModelError::InvalidArgument(format!(
            "board size must be positive, got {size}"
        ))),
    }
}

/// Allocates `side * side` empty cells, refusing sizes that overflow or
/// cannot be allocated.
fn empty_cells(side: usize) -> ModelResult<Vec<CellState>> {
    let too_large = || ModelError::InvalidArgument(format!("board size {side} is too large"));
    let len = side.checked_mul(side).ok_or_else(too_large)?;

    let mut cells = Vec::new();
    cells.try_reserve_exact(len).map_err(|_| too_large())?;
    cells.resize(len, CellState::Empty);
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_all_empty() {
        let board = Board::new(5).unwrap();
        assert_eq!(board.size(), 5);
        assert_eq!(board.rows().count(), 5);

        for row in board.rows() {
            assert_eq!(row.len(), 5);
            assert!(row.iter().all(|c| *c == CellState::Empty));
        }
        assert!(board.is_clear());
        assert!(!board.id().is_assigned());
    }

    #[test]
    fn test_non_positive_size_rejected() {
        assert!(matches!(Board::new(0), Err(ModelError::InvalidArgument(_))));
        assert!(matches!(Board::new(-3), Err(ModelError::InvalidArgument(_))));
        assert!(matches!(Board::new(0usize), Err(ModelError::InvalidArgument(_))));
    }

    #[test]
    fn test_set_cell_bounds() {
        let mut board = Board::new(3).unwrap();
        board.set_cell(2, 1, CellState::White).unwrap();
        assert_eq!(board.cell(2, 1), Some(CellState::White));
        assert_eq!(board.cell(3, 0), None);

        let err = board.set_cell(0, 3, CellState::Black).unwrap_err();
        assert_eq!(err, ModelError::OutOfBounds { row: 0, col: 3, size: 3 });
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut board = Board::new(4).unwrap();
        board.set_cell(1, 1, CellState::Black).unwrap();
        board.set_cell(3, 3, CellState::White).unwrap();

        board.resize(2).unwrap();
        assert_eq!(board.size(), 2);
        assert_eq!(board.cell(1, 1), Some(CellState::Black));

        board.resize(6).unwrap();
        assert_eq!(board.size(), 6);
        assert_eq!(board.cell(1, 1), Some(CellState::Black));
        assert_eq!(board.cell(3, 3), Some(CellState::Empty));
        assert_eq!(board.rows().count(), 6);

        assert!(board.resize(0).is_err());
        assert_eq!(board.size(), 6);
    }

    #[test]
    fn test_oversized_board_rejected() {
        let huge = 1usize << 33;
        assert!(matches!(Board::new(huge), Err(ModelError::InvalidArgument(_))));
        assert!(matches!(Board::new(usize::MAX), Err(ModelError::InvalidArgument(_))));

        let mut board = Board::new(3).unwrap();
        board.set_cell(1, 1, CellState::Black).unwrap();
        assert!(matches!(board.resize(huge), Err(ModelError::InvalidArgument(_))));
        assert_eq!(board.size(), 3);
        assert_eq!(board.cell(1, 1), Some(CellState::Black));
    }

    #[test]
    fn test_default_is_standard() {
        let board = Board::default();
        assert_eq!(board.size(), Board::STANDARD_SIZE);
        assert_eq!(board.rows().count(), 19);
        assert!(board.is_clear());
    }

    #[test]
    fn test_opponent() {
        assert_eq!(CellState::Black.opponent(), CellState::White);
        assert_eq!(CellState::White.opponent(), CellState::Black);
        assert_eq!(CellState::Empty.opponent(), CellState::Empty);
        assert!(!CellState::Empty.is_stone());
    }
}
