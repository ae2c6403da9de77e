//! Turn order, move application and game outcome.
//!
//! [`GameState`] is the only way to change a game: the board is reachable
//! read-only, and every mutation goes through [`GameState::apply_move`] and
//! [`GameState::promote_pawn`]. Both validate first and leave the state
//! untouched on any error.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::attacks::in_check;
use crate::board::{Board, CastlingRights, Position};
use crate::error::{RulesError, RulesResult};
use crate::legality::{all_legal_moves, has_legal_move, legal_targets};
use crate::notation::{coordinate, move_text, position_key, repetition_fields};
use crate::types::*;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// Status of the game after the last completed turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    /// The given side is in check but has a move.
    Check(Color),
    Checkmate { winner: Color },
    Stalemate,
    DrawByRepetition,
    DrawByFiftyMove,
    DrawByInsufficientMaterial,
}

impl Outcome {
    /// True when no further moves may be played.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress | Outcome::Check(_))
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Outcome::Stalemate
                | Outcome::DrawByRepetition
                | Outcome::DrawByFiftyMove
                | Outcome::DrawByInsufficientMaterial
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::Check(c) => write!(f, "{c} is in check"),
            Outcome::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Outcome::Stalemate => write!(f, "stalemate"),
            Outcome::DrawByRepetition => write!(f, "draw by threefold repetition"),
            Outcome::DrawByFiftyMove => write!(f, "draw by the fifty-move rule"),
            Outcome::DrawByInsufficientMaterial => write!(f, "draw by insufficient material"),
        }
    }
}

/// Where the game is in its turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    /// A piece of the side to move has been picked; its targets are known.
    PieceSelected(Square),
    /// A pawn stands on its last rank and needs a promotion choice.
    AwaitingPromotion(Square),
    GameOver(Outcome),
}

/// One played move, as recorded in the move history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece_kind: PieceKind,
    pub color: Color,
    pub is_capture: bool,
    pub is_en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    pub notation: String,
}

impl MoveRecord {
    /// Coordinate notation (`e2e4`, `e7e8q`, `e1g1`), as a search provider expects.
    pub fn coordinate(&self) -> String {
        coordinate(self.from, self.to, self.promotion)
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    position: Position,
    /// Keys of every position reached at a turn boundary, the start included.
    position_history: Vec<String>,
    move_history: Vec<MoveRecord>,
    phase: Phase,
    outcome: Outcome,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A game from the standard initial placement.
    pub fn new() -> Self {
        let position = Position::startpos();
        let key = position_key(&position);
        GameState {
            position,
            position_history: vec![key],
            move_history: Vec::new(),
            phase: Phase::AwaitingSelection,
            outcome: Outcome::InProgress,
        }
    }

    /// A game continuing from an arbitrary position. The outcome of the
    /// position is evaluated immediately.
    pub fn from_position(position: Position) -> RulesResult<Self> {
        position.board.validate()?;
        let key = position_key(&position);
        let mut game = GameState {
            position,
            position_history: vec![key],
            move_history: Vec::new(),
            phase: Phase::AwaitingSelection,
            outcome: Outcome::InProgress,
        };
        game.outcome = game.compute_outcome()?;
        if game.outcome.is_terminal() {
            game.phase = Phase::GameOver(game.outcome);
        }
        Ok(game)
    }

    pub fn from_fen(fen: &str) -> RulesResult<Self> {
        Self::from_position(Position::from_fen(fen)?)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn board(&self) -> &Board {
        &self.position.board
    }
    pub fn turn(&self) -> Color {
        self.position.side_to_move
    }
    pub fn castling(&self) -> &CastlingRights {
        &self.position.castling
    }
    pub fn en_passant_target(&self) -> Option<Square> {
        self.position.en_passant
    }
    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock
    }
    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }
    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    pub fn position_key(&self) -> String {
        position_key(&self.position)
    }

    /// Legal targets of the piece on `sq`. Empty when the square is empty,
    /// holds a piece of the side not to move, or no move can be made now
    /// (game over or a promotion pending).
    pub fn legal_moves(&self, sq: Square) -> RulesResult<Vec<Square>> {
        if !self.accepts_moves() {
            return Ok(Vec::new());
        }
        match self.position.board.piece_at(sq) {
            Some(pc) if pc.color == self.turn() => Ok(legal_targets(&self.position, sq)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Every legal `(from, to)` pair for the side to move.
    pub fn all_legal_moves(&self) -> RulesResult<Vec<(Square, Square)>> {
        if !self.accepts_moves() {
            return Ok(Vec::new());
        }
        Ok(all_legal_moves(&self.position, self.turn())?)
    }

    /// Pick the piece on `sq` and return its legal targets.
    pub fn select(&mut self, sq: Square) -> RulesResult<Vec<Square>> {
        self.ensure_accepts_moves()?;
        let targets = self.legal_moves(sq)?;
        self.phase = match self.position.board.piece_at(sq) {
            Some(pc) if pc.color == self.turn() => Phase::PieceSelected(sq),
            _ => Phase::AwaitingSelection,
        };
        Ok(targets)
    }

    pub fn clear_selection(&mut self) {
        if let Phase::PieceSelected(_) = self.phase {
            self.phase = Phase::AwaitingSelection;
        }
    }

    fn accepts_moves(&self) -> bool {
        matches!(
            self.phase,
            Phase::AwaitingSelection | Phase::PieceSelected(_)
        )
    }

    fn ensure_accepts_moves(&self) -> RulesResult<()> {
        match self.phase {
            Phase::AwaitingSelection | Phase::PieceSelected(_) => Ok(()),
            Phase::AwaitingPromotion(sq) => Err(RulesError::PromotionPending(sq)),
            Phase::GameOver(outcome) => Err(RulesError::GameOver(outcome)),
        }
    }

    /// Play the piece on `from` to `to`.
    ///
    /// When a pawn reaches its last rank the turn is left open in
    /// [`Phase::AwaitingPromotion`] and the returned record has no promotion
    /// yet; [`GameState::promote_pawn`] completes it.
    pub fn apply_move(&mut self, from: Square, to: Square) -> RulesResult<MoveRecord> {
        self.ensure_accepts_moves()?;
        let mover = self.turn();
        let illegal = RulesError::IllegalMove { from, to };
        match self.position.board.piece_at(from) {
            Some(pc) if pc.color == mover => {}
            _ => return Err(illegal),
        }
        if !legal_targets(&self.position, from)?.contains(&to) {
            return Err(illegal);
        }

        // Work on a copy so an invariant failure midway leaves the game as it was.
        let mut next = self.position.clone();

        // En-passant eligibility lasts a single ply.
        let own: Vec<Square> = next.board.pieces_of(mover).map(|(s, _)| s).collect();
        for s in own {
            if let Some(pc) = next.board.piece_mut(s) {
                pc.en_passant_eligible = false;
            }
        }

        let played = next.board.play(from, to, next.en_passant)?;
        let kind = played.moved.kind;

        next.en_passant = None;
        if kind == PieceKind::Pawn && from.rank().abs_diff(to.rank()) == 2 {
            if let Some(pc) = next.board.piece_mut(to) {
                pc.en_passant_eligible = true;
            }
            next.en_passant = Some(Square::at((from.rank() + to.rank()) / 2, from.file()));
        }

        next.halfmove_clock = if kind == PieceKind::Pawn || played.captured.is_some() {
            0
        } else {
            next.halfmove_clock + 1
        };

        if kind == PieceKind::King {
            next.castling.revoke_all(mover);
        }
        if kind == PieceKind::Rook {
            next.castling.revoke_corner(mover, from);
        }
        if let Some((cap_sq, cap)) = played.captured
            && cap.kind == PieceKind::Rook
        {
            next.castling.revoke_corner(cap.color, cap_sq);
        }

        let is_capture = played.captured.is_some();
        let record = MoveRecord {
            from,
            to,
            piece_kind: kind,
            color: mover,
            is_capture,
            is_en_passant: played.is_en_passant,
            castle: played.castle,
            promotion: None,
            notation: move_text(kind, from, to, is_capture, played.castle, None),
        };

        let promoting = kind == PieceKind::Pawn && to.rank() == mover.promotion_rank();
        let phase_before = self.phase;
        let previous = std::mem::replace(&mut self.position, next);
        self.move_history.push(record.clone());
        debug!(mv = %record.notation, color = %mover, "move applied");

        if promoting {
            self.phase = Phase::AwaitingPromotion(to);
            return Ok(record);
        }
        if let Err(e) = self.finish_turn() {
            // Roll back so the failed call has no visible effect.
            self.position = previous;
            self.move_history.pop();
            self.phase = phase_before;
            return Err(e);
        }
        Ok(record)
    }

    /// Replace the pawn awaiting promotion with a piece of `kind` and
    /// complete the turn.
    pub fn promote_pawn(&mut self, kind: PieceKind) -> RulesResult<MoveRecord> {
        let sq = match self.phase {
            Phase::AwaitingPromotion(sq) => sq,
            Phase::GameOver(outcome) => return Err(RulesError::GameOver(outcome)),
            _ => return Err(RulesError::NoPromotionPending),
        };
        if !kind.is_promotion_target() {
            return Err(RulesError::InvalidPromotion(kind));
        }
        let pawn = match self.position.board.piece_at(sq) {
            Some(pc) if pc.kind == PieceKind::Pawn => pc,
            _ => {
                error!(square = %sq, "promotion square lost its pawn");
                return Err(crate::error::InvariantViolation::EmptySquare(sq).into());
            }
        };

        let saved_board = self.position.board.clone();
        self.position.board.remove(sq);
        let mut promoted = Piece::new(pawn.color, kind);
        promoted.has_moved = true;
        self.position.board.place(sq, promoted)?;

        let Some(record) = self.move_history.last_mut() else {
            self.position.board = saved_board;
            return Err(RulesError::NoPromotionPending);
        };
        let saved_record = record.clone();
        record.promotion = Some(kind);
        record.notation.push(kind.letter());
        let record = record.clone();

        if let Err(e) = self.finish_turn() {
            self.position.board = saved_board;
            if let Some(last) = self.move_history.last_mut() {
                *last = saved_record;
            }
            self.phase = Phase::AwaitingPromotion(sq);
            return Err(e);
        }
        debug!(mv = %record.notation, "promotion completed");
        Ok(record)
    }

    /// Hand the move to the other side, record the new position and decide
    /// the outcome.
    fn finish_turn(&mut self) -> RulesResult<()> {
        let saved = (
            self.position.side_to_move,
            self.position.fullmove_number,
            self.position_history.len(),
        );
        if self.position.side_to_move == Color::Black {
            self.position.fullmove_number += 1;
        }
        self.position.side_to_move = self.position.side_to_move.other();
        self.position_history.push(position_key(&self.position));

        let outcome = match self
            .position
            .board
            .validate()
            .map_err(RulesError::from)
            .and_then(|_| self.compute_outcome())
        {
            Ok(o) => o,
            Err(e) => {
                error!(error = %e, "turn could not be completed");
                self.position.side_to_move = saved.0;
                self.position.fullmove_number = saved.1;
                self.position_history.truncate(saved.2);
                return Err(e);
            }
        };

        self.outcome = outcome;
        self.phase = if outcome.is_terminal() {
            debug!(%outcome, "game over");
            Phase::GameOver(outcome)
        } else {
            Phase::AwaitingSelection
        };
        Ok(())
    }

    fn compute_outcome(&self) -> RulesResult<Outcome> {
        let side = self.turn();
        let checked = in_check(&self.position.board, side)?;

        if !has_legal_move(&self.position, side)? {
            return Ok(if checked {
                Outcome::Checkmate {
                    winner: side.other(),
                }
            } else {
                Outcome::Stalemate
            });
        }
        if self.is_threefold_repetition() {
            return Ok(Outcome::DrawByRepetition);
        }
        if self.position.halfmove_clock >= FIFTY_MOVE_LIMIT {
            return Ok(Outcome::DrawByFiftyMove);
        }
        if is_insufficient_material(&self.position.board) {
            return Ok(Outcome::DrawByInsufficientMaterial);
        }
        if checked {
            return Ok(Outcome::Check(side));
        }
        Ok(Outcome::InProgress)
    }

    /// Has the current position (ignoring the halfmove clock) occurred at
    /// least twice before?
    fn is_threefold_repetition(&self) -> bool {
        let Some((current, earlier)) = self.position_history.split_last() else {
            return false;
        };
        let current = repetition_fields(current);
        earlier
            .iter()
            .filter(|k| repetition_fields(k) == current)
            .count()
            >= 2
    }
}

/// Material with which neither side can ever mate: K v K, K+minor v K,
/// K+B v K+B with same-colored bishops, K+NN v K.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors: [Vec<(PieceKind, Square)>; 2] = [Vec::new(), Vec::new()];
    for (s, pc) in board.pieces() {
        match pc.kind {
            PieceKind::King => {}
            PieceKind::Bishop | PieceKind::Knight => minors[pc.color.idx()].push((pc.kind, s)),
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }

    let (white, black) = (&minors[0], &minors[1]);
    let strong = match (white.len(), black.len()) {
        (0, 0) => return true,
        (_, 0) => white,
        (0, _) => black,
        (1, 1) => {
            return match (white[0], black[0]) {
                ((PieceKind::Bishop, ws), (PieceKind::Bishop, bs)) => ws.shade() == bs.shade(),
                _ => false,
            };
        }
        _ => return false,
    };

    match strong.as_slice() {
        [_] => true,
        [(PieceKind::Knight, _), (PieceKind::Knight, _)] => true,
        _ => false,
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
