//! Text encodings: position keys, move text, coordinate notation and FEN.

use crate::board::{Board, CastlingRights, Position};
use crate::error::{RulesError, RulesResult};
use crate::types::*;

/// Canonical key of a position.
///
/// Placement is written rank 0 (White's back rank) first, one letter per piece
/// (uppercase for White) with empty runs as digits and ranks separated by `/`.
/// The placement is followed by the side to move, castling rights, en-passant
/// target and halfmove clock, separated by spaces.
pub fn position_key(pos: &Position) -> String {
    let mut key = String::with_capacity(80);
    for rank in 0..8u8 {
        let mut empty = 0;
        for file in 0..8u8 {
            match pos.board.piece_at(Square::at(rank, file)) {
                Some(pc) => {
                    if empty > 0 {
                        key.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    key.push(pc.symbol());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            key.push((b'0' + empty) as char);
        }
        if rank < 7 {
            key.push('/');
        }
    }

    key.push(' ');
    key.push(match pos.side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });
    key.push(' ');
    key.push_str(&castling_field(&pos.castling));
    key.push(' ');
    match pos.en_passant {
        Some(ep) => key.push_str(&ep.to_string()),
        None => key.push('-'),
    }
    key.push(' ');
    key.push_str(&pos.halfmove_clock.to_string());
    key
}

/// The part of a key that decides repetition: everything except the
/// trailing halfmove clock.
pub fn repetition_fields(key: &str) -> &str {
    match key.rfind(' ') {
        Some(idx) => &key[..idx],
        None => key,
    }
}

fn castling_field(c: &CastlingRights) -> String {
    let mut s = String::with_capacity(4);
    for (flag, ch) in [(c.wk, 'K'), (c.wq, 'Q'), (c.bk, 'k'), (c.bq, 'q')] {
        if flag {
            s.push(ch);
        }
    }
    if s.is_empty() {
        s.push('-');
    }
    s
}

/// Human-readable move text: piece letter (none for pawns), origin, `x` on
/// capture, destination; `O-O`/`O-O-O` for castling; a lowercase promotion
/// letter at the end.
pub fn move_text(
    kind: PieceKind,
    from: Square,
    to: Square,
    is_capture: bool,
    castle: Option<CastleSide>,
    promotion: Option<PieceKind>,
) -> String {
    if let Some(side) = castle {
        return side.notation().to_string();
    }
    let mut s = String::with_capacity(8);
    if kind != PieceKind::Pawn {
        s.push(kind.letter().to_ascii_uppercase());
    }
    s.push_str(&from.to_string());
    if is_capture {
        s.push('x');
    }
    s.push_str(&to.to_string());
    if let Some(p) = promotion {
        s.push(p.letter());
    }
    s
}

/// `<from><to>[promotion]`, e.g. `e2e4` or `e7e8q`.
pub fn coordinate(from: Square, to: Square, promotion: Option<PieceKind>) -> String {
    let mut s = format!("{from}{to}");
    if let Some(p) = promotion {
        s.push(p.letter());
    }
    s
}

/// Does moving the piece on `from` to `to` put a pawn on its last rank?
pub fn is_promotion_move(pos: &Position, from: Square, to: Square) -> bool {
    matches!(
        pos.board.piece_at(from),
        Some(pc) if pc.kind == PieceKind::Pawn && to.rank() == pc.color.promotion_rank()
    )
}

/// A move parsed from text. Whether it is legal is decided by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

/// Parse a move token for the side to move in `pos`.
///
/// Accepts coordinate notation (`e2e4`, `e7e8q`), the crate's own move text
/// (`Ng1f3`, `e4xd5`, `e7e8q`) and castling (`O-O`, `O-O-O`, also with zeros).
/// Check marks and an `=` before the promotion letter are tolerated.
pub fn parse_move_text(pos: &Position, token: &str) -> RulesResult<ParsedMove> {
    let invalid = || RulesError::InvalidMoveText(token.to_string());
    let txt = token.trim().trim_end_matches(['+', '#']);

    let castle = match txt {
        "O-O" | "0-0" => Some(CastleSide::Kingside),
        "O-O-O" | "0-0-0" => Some(CastleSide::Queenside),
        _ => None,
    };
    if let Some(side) = castle {
        let home = pos.side_to_move.home_rank();
        return Ok(ParsedMove {
            from: Square::at(home, 4),
            to: Square::at(home, side.king_file()),
            promotion: None,
        });
    }

    let mut chars = txt.chars().peekable();
    let piece_letter = match chars.peek() {
        Some(&ch) if ch.is_ascii_uppercase() => {
            chars.next();
            Some(PieceKind::from_letter(ch).ok_or_else(invalid)?)
        }
        _ => None,
    };
    let rest: String = chars.filter(|&ch| !matches!(ch, 'x' | '-' | '=')).collect();
    if !rest.is_ascii() || !(4..=5).contains(&rest.len()) {
        return Err(invalid());
    }

    let from = Square::parse(&rest[0..2]).ok_or_else(invalid)?;
    let to = Square::parse(&rest[2..4]).ok_or_else(invalid)?;
    let promotion = match rest[4..].chars().next() {
        Some(ch) => {
            let kind = PieceKind::from_letter(ch).ok_or_else(invalid)?;
            if !kind.is_promotion_target() {
                return Err(invalid());
            }
            Some(kind)
        }
        None => None,
    };

    if let Some(kind) = piece_letter {
        match pos.board.piece_at(from) {
            Some(pc) if pc.kind == kind => {}
            _ => return Err(invalid()),
        }
    }

    Ok(ParsedMove {
        from,
        to,
        promotion,
    })
}

/// Parse standard Forsyth-Edwards Notation (rank 8 first).
///
/// Halfmove clock and fullmove number are optional. Flags the FEN does not
/// carry are derived: pawns off their start rank, and kings and rooks without
/// a matching castling right, count as moved; the pawn behind an en-passant
/// target is marked eligible for capture.
pub fn parse_fen(fen: &str) -> RulesResult<Position> {
    let bad = |msg: &str| RulesError::InvalidFen(format!("{msg}: {fen}"));

    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 || parts.len() > 6 {
        return Err(bad("expected 4 to 6 fields"));
    }

    let mut board = Board::empty();
    let ranks: Vec<&str> = parts[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(bad("expected 8 ranks"));
    }
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as u8; // FEN lists rank 8 .. 1
        let mut file: u8 = 0;
        for ch in rank_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                if !(1..=8).contains(&d) {
                    return Err(bad("bad empty-square count"));
                }
                file += d as u8;
            } else {
                let kind = PieceKind::from_letter(ch).ok_or_else(|| bad("bad piece letter"))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::new(rank, file).ok_or_else(|| bad("too many files in rank"))?;
                board
                    .place(sq, Piece::new(color, kind))
                    .map_err(|_| bad("square given twice"))?;
                file += 1;
            }
            if file > 8 {
                return Err(bad("too many files in rank"));
            }
        }
        if file != 8 {
            return Err(bad("not enough files in rank"));
        }
    }

    let side_to_move = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(bad("bad side to move")),
    };

    let mut castling = CastlingRights::none();
    if parts[2] != "-" {
        for c in parts[2].chars() {
            match c {
                'K' => castling.wk = true,
                'Q' => castling.wq = true,
                'k' => castling.bk = true,
                'q' => castling.bq = true,
                _ => return Err(bad("bad castling field")),
            }
        }
    }

    let en_passant = match parts[3] {
        "-" => None,
        txt => {
            let ep = Square::parse(txt).ok_or_else(|| bad("bad en-passant square"))?;
            let pusher = side_to_move.other();
            if ep.rank() as i8 != pusher.pawn_rank() as i8 + pusher.forward() {
                return Err(bad("en-passant square on wrong rank"));
            }
            Some(ep)
        }
    };

    let halfmove_clock: u32 = match parts.get(4) {
        Some(t) => t.parse().map_err(|_| bad("bad halfmove clock"))?,
        None => 0,
    };
    let fullmove_number: u32 = match parts.get(5) {
        Some(t) => t.parse().map_err(|_| bad("bad fullmove number"))?,
        None => 1,
    };

    derive_flags(&mut board, &mut castling, side_to_move, en_passant);

    Ok(Position {
        board,
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
    })
}

fn derive_flags(
    board: &mut Board,
    castling: &mut CastlingRights,
    side_to_move: Color,
    en_passant: Option<Square>,
) {
    // Rights without the king and rook on their home squares cannot be used.
    for c in [Color::White, Color::Black] {
        let home = c.home_rank();
        let king_home = matches!(
            board.piece_at(Square::at(home, 4)),
            Some(pc) if pc.is(c, PieceKind::King)
        );
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            let rook_home = matches!(
                board.piece_at(Square::at(home, side.rook_file())),
                Some(pc) if pc.is(c, PieceKind::Rook)
            );
            if !(king_home && rook_home) {
                castling.revoke(c, side);
            }
        }
    }

    let squares: Vec<Square> = board.pieces().map(|(s, _)| s).collect();
    for s in squares {
        let Some(pc) = board.piece_mut(s) else {
            continue;
        };
        let c = pc.color;
        pc.has_moved = match pc.kind {
            PieceKind::Pawn => s.rank() != c.pawn_rank(),
            PieceKind::King => {
                !(castling.has(c, CastleSide::Kingside) || castling.has(c, CastleSide::Queenside))
            }
            PieceKind::Rook => ![CastleSide::Kingside, CastleSide::Queenside]
                .into_iter()
                .any(|side| {
                    castling.has(c, side) && s == Square::at(c.home_rank(), side.rook_file())
                }),
            _ => false,
        };
    }

    if let Some(ep) = en_passant {
        let pusher = side_to_move.other();
        if let Some(pawn_sq) = ep.offset(pusher.forward(), 0)
            && let Some(pc) = board.piece_mut(pawn_sq)
            && pc.is(pusher, PieceKind::Pawn)
        {
            pc.en_passant_eligible = true;
        }
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
