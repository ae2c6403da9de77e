//! Error types for the rules engine.
//!
//! Player-facing errors (illegal moves, calls in the wrong phase, unparsable
//! text) leave the game untouched. Invariant violations mean the engine itself
//! is broken and the operation that found them is aborted.

use thiserror::Error;

use crate::game::Outcome;
use crate::types::{Color, PieceKind, Square};

/// Broken board invariants. Never produced by a legal sequence of moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("no {0} king on the board")]
    MissingKing(Color),

    #[error("more than one {0} king on the board")]
    DuplicateKing(Color),

    #[error("square {0} is already occupied")]
    SquareOccupied(Square),

    #[error("square {0} holds no piece")]
    EmptySquare(Square),
}

/// Errors returned by [`crate::GameState`] operations and the notation codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// Target not in the legal set of the piece on `from`.
    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("a promotion choice is pending on {0}")]
    PromotionPending(Square),

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),

    #[error("game is over: {0}")]
    GameOver(Outcome),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid move text: {0:?}")]
    InvalidMoveText(String),

    #[error("board invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Coarse classification of [`RulesError`] for callers that only need to
/// decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IllegalMove,
    State,
    Parse,
    Invariant,
}

impl RulesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RulesError::IllegalMove { .. } => ErrorKind::IllegalMove,
            RulesError::PromotionPending(_)
            | RulesError::NoPromotionPending
            | RulesError::InvalidPromotion(_)
            | RulesError::GameOver(_) => ErrorKind::State,
            RulesError::InvalidFen(_) | RulesError::InvalidMoveText(_) => ErrorKind::Parse,
            RulesError::Invariant(_) => ErrorKind::Invariant,
        }
    }

    /// Only invariant violations are unrecoverable.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Invariant
    }
}

/// Result type alias for rules engine operations
pub type RulesResult<T> = Result<T, RulesError>;
