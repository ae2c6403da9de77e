//! Square attack detection.
//!
//! Attacks are found by looking outward from the target square for each
//! attack pattern (pawn diagonals, knight jumps, king adjacency, sliding rays).
//! Nothing here calls move generation, so king move generation can use it
//! freely.

use crate::board::Board;
use crate::error::InvariantViolation;
use crate::types::*;

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Is `target` attacked by any piece of color `by`?
///
/// `ignore`, when given, is treated as an empty square: it neither attacks nor
/// blocks a ray. King move generation passes the king's own square here so a
/// king cannot "hide" behind itself on a line it is stepping along.
pub fn is_attacked(board: &Board, target: Square, by: Color, ignore: Option<Square>) -> bool {
    let occupant = |s: Square| {
        if Some(s) == ignore {
            None
        } else {
            board.piece_at(s)
        }
    };

    // Pawns of `by` attack forward, so look one step backward from the target.
    let back = -by.forward();
    for df in [-1, 1] {
        if let Some(s) = target.offset(back, df)
            && let Some(pc) = occupant(s)
            && pc.is(by, PieceKind::Pawn)
        {
            return true;
        }
    }

    for (dr, df) in KNIGHT_DELTAS {
        if let Some(s) = target.offset(dr, df)
            && let Some(pc) = occupant(s)
            && pc.is(by, PieceKind::Knight)
        {
            return true;
        }
    }

    for (dr, df) in KING_DELTAS {
        if let Some(s) = target.offset(dr, df)
            && let Some(pc) = occupant(s)
            && pc.is(by, PieceKind::King)
        {
            return true;
        }
    }

    let sliders = [
        (&DIAGONALS, PieceKind::Bishop),
        (&ORTHOGONALS, PieceKind::Rook),
    ];
    for (dirs, kind) in sliders {
        for &(dr, df) in dirs.iter() {
            let mut cur = target.offset(dr, df);
            while let Some(s) = cur {
                if let Some(pc) = occupant(s) {
                    if pc.color == by && (pc.kind == kind || pc.kind == PieceKind::Queen) {
                        return true;
                    }
                    break;
                }
                cur = s.offset(dr, df);
            }
        }
    }

    false
}

/// Is the king of color `c` attacked?
pub fn in_check(board: &Board, c: Color) -> Result<bool, InvariantViolation> {
    let ksq = board.king_square(c)?;
    Ok(is_attacked(board, ksq, c.other(), None))
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
