//! Pseudo-legal move generation.
//!
//! Targets produced here follow each piece's movement pattern and the
//! occupancy rules but do not consider whether the mover's own king is left
//! in check; [`crate::legality`] filters for that. The one exception is the
//! king, whose steps and castling path are already screened against enemy
//! attacks.

use crate::attacks::{DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, ORTHOGONALS, is_attacked};
use crate::board::Position;
use crate::types::*;

const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

/// Pseudo-legal targets of the piece on `from`, empty when the square is.
pub fn pseudo_legal_targets(pos: &Position, from: Square) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    pseudo_legal_targets_into(pos, from, &mut out);
    out
}

/// Same as [`pseudo_legal_targets`] but reuses the caller's buffer.
pub fn pseudo_legal_targets_into(pos: &Position, from: Square, out: &mut Vec<Square>) {
    out.clear();
    let pc = match pos.board.piece_at(from) {
        Some(p) => p,
        None => return,
    };
    match pc.kind {
        PieceKind::Pawn => gen_pawn(pos, from, pc, out),
        PieceKind::Knight => gen_steps(pos, from, pc.color, &KNIGHT_DELTAS, out),
        PieceKind::Bishop => gen_slider(pos, from, pc.color, &DIAGONALS, out),
        PieceKind::Rook => gen_slider(pos, from, pc.color, &ORTHOGONALS, out),
        PieceKind::Queen => gen_slider(pos, from, pc.color, &ALL_DIRECTIONS, out),
        PieceKind::King => {
            gen_king(pos, from, pc.color, out);
            if !pc.has_moved {
                gen_castle(pos, from, pc.color, out);
            }
        }
    }
}

fn gen_pawn(pos: &Position, from: Square, pc: Piece, out: &mut Vec<Square>) {
    let c = pc.color;
    let dir = c.forward();
    let board = &pos.board;

    // forward 1
    if let Some(to) = from.offset(dir, 0)
        && board.is_empty(to)
    {
        out.push(to);

        // forward 2 from start
        if !pc.has_moved
            && from.rank() == c.pawn_rank()
            && let Some(to2) = to.offset(dir, 0)
            && board.is_empty(to2)
        {
            out.push(to2);
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        let Some(to) = from.offset(dir, df) else {
            continue;
        };
        if board.is_enemy(to, c) {
            out.push(to);
        } else if pos.en_passant == Some(to) && board.is_empty(to) {
            // The pawn being taken stands beside us, on our rank.
            let beside = Square::at(from.rank(), to.file());
            if let Some(victim) = board.piece_at(beside)
                && victim.is(c.other(), PieceKind::Pawn)
                && victim.en_passant_eligible
            {
                out.push(to);
            }
        }
    }
}

fn gen_steps(pos: &Position, from: Square, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(dr, df) in deltas {
        if let Some(to) = from.offset(dr, df)
            && !pos.board.is_friendly(to, c)
        {
            out.push(to);
        }
    }
}

fn gen_slider(pos: &Position, from: Square, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Square>) {
    for &(dr, df) in dirs {
        let mut cur = from.offset(dr, df);
        while let Some(to) = cur {
            match pos.board.piece_at(to) {
                None => out.push(to),
                Some(pc) if pc.color != c => {
                    out.push(to);
                    break;
                }
                _ => break,
            }
            cur = to.offset(dr, df);
        }
    }
}

fn gen_king(pos: &Position, from: Square, c: Color, out: &mut Vec<Square>) {
    let enemy = c.other();
    for (dr, df) in KING_DELTAS {
        if let Some(to) = from.offset(dr, df)
            && !pos.board.is_friendly(to, c)
            && !is_attacked(&pos.board, to, enemy, Some(from))
        {
            out.push(to);
        }
    }
}

fn gen_castle(pos: &Position, from: Square, c: Color, out: &mut Vec<Square>) {
    let home = c.home_rank();
    // Must be on original king square
    if from != Square::at(home, 4) {
        return;
    }
    let enemy = c.other();
    // Can't castle out of check.
    if is_attacked(&pos.board, from, enemy, None) {
        return;
    }

    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if !pos.castling.has(c, side) {
            continue;
        }
        let rook_sq = Square::at(home, side.rook_file());
        match pos.board.piece_at(rook_sq) {
            Some(rook) if rook.is(c, PieceKind::Rook) && !rook.has_moved => {}
            _ => continue,
        }

        let (lo, hi) = if side.rook_file() < 4 {
            (side.rook_file() + 1, 4)
        } else {
            (5, side.rook_file())
        };
        if !(lo..hi).all(|f| pos.board.is_empty(Square::at(home, f))) {
            continue;
        }

        let transit = Square::at(home, side.rook_target_file());
        let landing = Square::at(home, side.king_file());
        if is_attacked(&pos.board, transit, enemy, None)
            || is_attacked(&pos.board, landing, enemy, None)
        {
            continue;
        }
        out.push(landing);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
