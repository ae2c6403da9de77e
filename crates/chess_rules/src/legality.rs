//! Legal move filtering by simulation.
//!
//! Every candidate is played on a scratch copy of the board and kept only if
//! the mover's king is not attacked afterwards. This covers pins, discovered
//! checks, double checks and en-passant captures that expose the king along a
//! rank, without any special-case pin logic.

use tracing::trace;

use crate::attacks::in_check;
use crate::board::{Board, Position};
use crate::error::InvariantViolation;
use crate::movegen::pseudo_legal_targets_into;
use crate::types::*;

/// Board after playing `from -> to` on a copy; `pos` is left untouched.
pub fn simulate(pos: &Position, from: Square, to: Square) -> Result<Board, InvariantViolation> {
    let mut scratch = pos.board.clone();
    scratch.play(from, to, pos.en_passant)?;
    Ok(scratch)
}

/// Does `from -> to` leave the mover's own king safe?
///
/// The target is assumed to be pseudo-legal.
pub fn is_legal(pos: &Position, from: Square, to: Square) -> Result<bool, InvariantViolation> {
    let mover = pos
        .board
        .piece_at(from)
        .ok_or(InvariantViolation::EmptySquare(from))?
        .color;
    let scratch = simulate(pos, from, to)?;
    let exposed = in_check(&scratch, mover)?;
    if exposed {
        trace!(%from, %to, "rejected: leaves king in check");
    }
    Ok(!exposed)
}

/// Legal targets of the piece on `from`.
pub fn legal_targets(pos: &Position, from: Square) -> Result<Vec<Square>, InvariantViolation> {
    let mut out = Vec::with_capacity(28);
    legal_targets_into(pos, from, &mut out)?;
    Ok(out)
}

/// Generate legal targets into the provided buffer, reusing it across calls.
pub fn legal_targets_into(
    pos: &Position,
    from: Square,
    out: &mut Vec<Square>,
) -> Result<(), InvariantViolation> {
    pseudo_legal_targets_into(pos, from, out);
    let mut kept = Vec::with_capacity(out.len());
    for &to in out.iter() {
        if is_legal(pos, from, to)? {
            kept.push(to);
        }
    }
    *out = kept;
    Ok(())
}

/// Every legal `(from, to)` pair for `color`, in square order.
pub fn all_legal_moves(
    pos: &Position,
    color: Color,
) -> Result<Vec<(Square, Square)>, InvariantViolation> {
    let mut moves = Vec::with_capacity(64);
    let mut buf = Vec::with_capacity(28);
    for (from, _) in pos.board.pieces_of(color) {
        legal_targets_into(pos, from, &mut buf)?;
        moves.extend(buf.iter().map(|&to| (from, to)));
    }
    Ok(moves)
}

/// Does `color` have at least one legal move? Stops at the first one found.
pub fn has_legal_move(pos: &Position, color: Color) -> Result<bool, InvariantViolation> {
    let mut buf = Vec::with_capacity(28);
    for (from, _) in pos.board.pieces_of(color) {
        legal_targets_into(pos, from, &mut buf)?;
        if !buf.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "legality_tests.rs"]
mod legality_tests;
