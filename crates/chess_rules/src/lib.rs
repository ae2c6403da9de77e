//! Chess rules engine: move generation, legality, turn bookkeeping and game
//! outcome for a standard game.
//!
//! The entry point is [`GameState`]. It owns the board and only changes it
//! through [`GameState::apply_move`] and [`GameState::promote_pawn`].

pub mod attacks;
pub mod board;
pub mod error;
pub mod game;
pub mod legality;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod types;

// Re-export the rules surface
pub use attacks::{in_check, is_attacked};
pub use board::*;
pub use error::*;
pub use game::*;
pub use legality::{all_legal_moves, has_legal_move, is_legal, legal_targets, simulate};
pub use movegen::pseudo_legal_targets;
pub use notation::*;
pub use perft::perft;
pub use types::*;
