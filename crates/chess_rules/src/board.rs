use serde::{Deserialize, Serialize};
use tracing::error;

use crate::attacks::in_check;
use crate::error::{InvariantViolation, RulesResult};
use crate::notation::parse_fen;
use crate::types::*;

/// Piece placement, one optional piece per square.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    pub fn startpos() -> Self {
        let mut b = Board::empty();

        // Pawns
        for f in 0..8 {
            b.squares[Square::at(1, f).index()] =
                Some(Piece::new(Color::White, PieceKind::Pawn));
            b.squares[Square::at(6, f).index()] =
                Some(Piece::new(Color::Black, PieceKind::Pawn));
        }
        // Back ranks
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            b.squares[Square::at(0, f as u8).index()] = Some(Piece::new(Color::White, kind));
            b.squares[Square::at(7, f as u8).index()] = Some(Piece::new(Color::Black, kind));
        }
        b
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    /// True iff `sq` holds a piece of the side opposing `color`.
    pub fn is_enemy(&self, sq: Square, color: Color) -> bool {
        matches!(self.piece_at(sq), Some(pc) if pc.color != color)
    }

    pub fn is_friendly(&self, sq: Square, color: Color) -> bool {
        matches!(self.piece_at(sq), Some(pc) if pc.color == color)
    }

    /// Put a piece on an empty square.
    pub(crate) fn place(&mut self, sq: Square, piece: Piece) -> Result<(), InvariantViolation> {
        let slot = &mut self.squares[sq.index()];
        if slot.is_some() {
            return Err(InvariantViolation::SquareOccupied(sq));
        }
        *slot = Some(piece);
        Ok(())
    }

    pub(crate) fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// Move whatever stands on `from` to the empty square `to`.
    pub(crate) fn relocate(&mut self, from: Square, to: Square) -> Result<Piece, InvariantViolation> {
        if !self.is_empty(to) {
            return Err(InvariantViolation::SquareOccupied(to));
        }
        let piece = self
            .remove(from)
            .ok_or(InvariantViolation::EmptySquare(from))?;
        self.squares[to.index()] = Some(piece);
        Ok(piece)
    }

    pub(crate) fn piece_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.squares[sq.index()].as_mut()
    }

    /// Occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |s| self.piece_at(s).map(|pc| (s, pc)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, pc)| pc.color == color)
    }

    pub fn king_square(&self, c: Color) -> Result<Square, InvariantViolation> {
        self.pieces()
            .find(|(_, pc)| pc.is(c, PieceKind::King))
            .map(|(s, _)| s)
            .ok_or_else(|| {
                error!(color = %c, "king missing from board");
                InvariantViolation::MissingKing(c)
            })
    }

    /// Exactly one king per color.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for c in [Color::White, Color::Black] {
            let kings = self
                .pieces()
                .filter(|(_, pc)| pc.is(c, PieceKind::King))
                .count();
            match kings {
                0 => {
                    error!(color = %c, "king missing from board");
                    return Err(InvariantViolation::MissingKing(c));
                }
                1 => {}
                _ => {
                    error!(color = %c, kings, "duplicate king on board");
                    return Err(InvariantViolation::DuplicateKing(c));
                }
            }
        }
        Ok(())
    }

    /// Carry out the board part of a move: castling rook, en-passant victim,
    /// ordinary capture and the moving piece itself. No legality checks.
    pub(crate) fn play(
        &mut self,
        from: Square,
        to: Square,
        en_passant: Option<Square>,
    ) -> Result<Played, InvariantViolation> {
        let moved = self
            .piece_at(from)
            .ok_or(InvariantViolation::EmptySquare(from))?;

        let mut castle = None;
        if moved.kind == PieceKind::King
            && to.rank() == from.rank()
            && from.file().abs_diff(to.file()) == 2
        {
            let side = if to.file() > from.file() {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rook_from = Square::at(from.rank(), side.rook_file());
            let rook_to = Square::at(from.rank(), side.rook_target_file());
            self.relocate(rook_from, rook_to)?;
            if let Some(rook) = self.piece_mut(rook_to) {
                rook.has_moved = true;
            }
            castle = Some(side);
        }

        let mut captured = None;
        let mut is_en_passant = false;
        if moved.kind == PieceKind::Pawn
            && en_passant == Some(to)
            && from.file() != to.file()
            && self.is_empty(to)
        {
            // The victim sits beside the mover, not on the target square.
            let victim_sq = Square::at(from.rank(), to.file());
            if let Some(victim) = self.piece_at(victim_sq)
                && victim.kind == PieceKind::Pawn
                && victim.color != moved.color
            {
                self.remove(victim_sq);
                captured = Some((victim_sq, victim));
                is_en_passant = true;
            }
        }

        if let Some(victim) = self.remove(to) {
            captured = Some((to, victim));
        }

        self.relocate(from, to)?;
        if let Some(pc) = self.piece_mut(to) {
            pc.has_moved = true;
        }

        Ok(Played {
            moved,
            captured,
            is_en_passant,
            castle,
        })
    }
}

/// What [`Board::play`] did, for the bookkeeping that follows it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Played {
    /// The moving piece as it was before the move.
    pub moved: Piece,
    pub captured: Option<(Square, Piece)>,
    pub is_en_passant: bool,
    pub castle: Option<CastleSide>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        CastlingRights {
            wk: true,
            wq: true,
            bk: true,
            bq: true,
        }
    }

    pub fn none() -> Self {
        CastlingRights {
            wk: false,
            wq: false,
            bk: false,
            bq: false,
        }
    }

    pub fn has(&self, c: Color, side: CastleSide) -> bool {
        match (c, side) {
            (Color::White, CastleSide::Kingside) => self.wk,
            (Color::White, CastleSide::Queenside) => self.wq,
            (Color::Black, CastleSide::Kingside) => self.bk,
            (Color::Black, CastleSide::Queenside) => self.bq,
        }
    }

    pub fn revoke(&mut self, c: Color, side: CastleSide) {
        match (c, side) {
            (Color::White, CastleSide::Kingside) => self.wk = false,
            (Color::White, CastleSide::Queenside) => self.wq = false,
            (Color::Black, CastleSide::Kingside) => self.bk = false,
            (Color::Black, CastleSide::Queenside) => self.bq = false,
        }
    }

    pub fn revoke_all(&mut self, c: Color) {
        self.revoke(c, CastleSide::Kingside);
        self.revoke(c, CastleSide::Queenside);
    }

    /// Drop the right tied to a rook home corner, if `sq` is one.
    pub fn revoke_corner(&mut self, c: Color, sq: Square) {
        if sq.rank() != c.home_rank() {
            return;
        }
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if sq.file() == side.rook_file() {
                self.revoke(c, side);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.wk || self.wq || self.bk || self.bq)
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

/// Everything needed to generate moves: placement plus the state fields a
/// position key records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    pub fn startpos() -> Self {
        Position {
            board: Board::startpos(),
            side_to_move: Color::White,
            castling: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Forsyth-Edwards Notation, used by tests and tooling to set up positions.
    pub fn from_fen(fen: &str) -> RulesResult<Self> {
        parse_fen(fen)
    }

    pub fn in_check(&self, c: Color) -> Result<bool, InvariantViolation> {
        in_check(&self.board, c)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
