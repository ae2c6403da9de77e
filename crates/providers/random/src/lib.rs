//! Random Move Provider
//!
//! Picks uniformly among the legal moves of the side to move.
//! Useful for:
//! - Playing against the console without a real engine
//! - Exercising the session's computer-turn path end to end

use chess_rules::{all_legal_moves, coordinate, is_promotion_move, PieceKind};
use chess_session::{MoveProvider, ProviderError, SearchRequest};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;


/// A provider that plays random legal moves.
///
/// It ignores depth and personality. Promotions are always to a queen.
pub struct RandomProvider {
    rng: StdRng,
    moves_made: u64,
}

impl RandomProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            moves_made: 0,
        }
    }

    /// Same seed, same game.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            moves_made: 0,
        }
    }

    pub fn moves_made(&self) -> u64 {
        self.moves_made
    }
}

impl Default for RandomProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveProvider for RandomProvider {
    fn best_move(&mut self, request: &SearchRequest) -> Result<String, ProviderError> {
        let pos = &request.position;
        let moves = all_legal_moves(pos, request.color)
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;

        let &(from, to) = moves
            .choose(&mut self.rng)
            .ok_or_else(|| ProviderError::Unavailable("no legal moves".into()))?;

        let promotion = is_promotion_move(pos, from, to).then_some(PieceKind::Queen);
        self.moves_made += 1;
        trace!(candidates = moves.len(), %from, %to, "random move chosen");
        Ok(coordinate(from, to, promotion))
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }

    fn new_game(&mut self) {
        self.moves_made = 0;
    }
}
