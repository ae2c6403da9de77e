use crate::error::RulesResult;
use crate::game::{GameState, Phase};
use crate::types::PieceKind;

/// Perft node count through the public game API.
///
/// Each promotion counts once per promotion piece. A position whose game is
/// over contributes no children, which never happens within the shallow
/// depths used for testing.
pub fn perft(game: &GameState, depth: u8) -> RulesResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let mut nodes = 0u64;
    for (from, to) in game.all_legal_moves()? {
        let mut next = game.clone();
        next.apply_move(from, to)?;
        if let Phase::AwaitingPromotion(_) = next.phase() {
            for kind in PieceKind::PROMOTIONS {
                let mut promoted = next.clone();
                promoted.promote_pawn(kind)?;
                nodes += perft(&promoted, depth - 1)?;
            }
        } else {
            nodes += perft(&next, depth - 1)?;
        }
    }
    Ok(nodes)
}
