//! # Model Error Types
//!
//! Validation failures raised while building or mutating domain records.
//!
//! Lookups and seat operations do not use these: they answer with
//! `bool`/`Option` and never distinguish "not found" from "refused".

use thiserror::Error;

use crate::game::GameStatus;

/// Errors that can occur in the domain model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A constructor or mutator received an argument it cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Cell coordinates fall outside the board.
    #[error("cell ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Side length of the board.
        size: usize,
    },

    /// The game already has a terminal status.
    #[error("game is over ({status:?})")]
    GameOver {
        /// The terminal status the game ended with.
        status: GameStatus,
    },

    /// A status change that the validated transition path does not allow.
    #[error("invalid status transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// Status before the change.
        from: GameStatus,
        /// Requested status.
        to: GameStatus,
    },
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
