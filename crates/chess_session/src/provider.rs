//! The seam between a session and whatever picks the computer's moves.

use chess_rules::{Color, Position};

use crate::config::Personality;
use crate::error::ProviderError;
use crate::time_control::TimeControl;

/// Everything a provider gets to decide one move.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Moves played so far, space-separated coordinate notation (`e2e4 e7e5`)
    pub history: String,
    pub depth: u8,
    /// Side the provider is choosing for
    pub color: Color,
    pub personality: Personality,
    pub position_key: String,
    /// Snapshot of the current position, for providers that generate moves
    /// themselves rather than replaying `history`.
    pub position: Position,
    /// Deadline for the answer; already started when the provider is called.
    pub time_control: TimeControl,
}

impl SearchRequest {
    pub fn moves(&self) -> impl Iterator<Item = &str> {
        self.history.split_whitespace()
    }
}

/// Something that picks moves for the computer-controlled side.
///
/// Answers are coordinate notation (`e2e4`, `e7e8q`) or `O-O`/`O-O-O`. The
/// session validates every answer; nothing a provider returns reaches the
/// board without passing the rules engine.
pub trait MoveProvider: Send {
    fn best_move(&mut self, request: &SearchRequest) -> Result<String, ProviderError>;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
