//! Whole-game scenarios played through the public API.

use chess_rules::{Color, GameState, Outcome, Phase, PieceKind, parse_move_text, sq};

fn play(game: &mut GameState, moves: &[&str]) {
    for mv in moves {
        let parsed = parse_move_text(game.position(), mv).unwrap();
        game.apply_move(parsed.from, parsed.to)
            .unwrap_or_else(|e| panic!("{mv}: {e}"));
        if let Some(kind) = parsed.promotion {
            game.promote_pawn(kind).unwrap();
        }
    }
}

#[test]
fn fools_mate() {
    let mut game = GameState::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4"]);
    assert_eq!(game.outcome(), Outcome::InProgress);
    play(&mut game, &["d8h4"]);
    assert_eq!(
        game.outcome(),
        Outcome::Checkmate {
            winner: Color::Black
        }
    );
    assert_eq!(game.move_history().last().unwrap().notation, "Qd8h4");
}

#[test]
fn en_passant_capture() {
    let mut game = GameState::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(game.en_passant_target(), Some(sq("d6")));
    assert!(game.legal_moves(sq("e5")).unwrap().contains(&sq("d6")));

    play(&mut game, &["e5d6"]);
    assert!(game.board().is_empty(sq("d5")));
    assert!(game.board().is_empty(sq("e5")));
    assert!(
        game.board()
            .piece_at(sq("d6"))
            .unwrap()
            .is(Color::White, PieceKind::Pawn)
    );
    assert!(game.move_history().last().unwrap().is_en_passant);
}

#[test]
fn en_passant_expires_after_one_ply() {
    let mut game = GameState::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5", "g1f3", "a6a5"]);
    assert!(!game.legal_moves(sq("e5")).unwrap().contains(&sq("d6")));
}

#[test]
fn castling_through_attacked_square_is_refused() {
    let game = GameState::from_fen("4k3/8/b7/8/8/8/8/4K2R w K - 0 1").unwrap();
    let targets = game.legal_moves(sq("e1")).unwrap();
    assert!(!targets.contains(&sq("g1")));
    assert!(!targets.contains(&sq("f1")));
    assert!(targets.contains(&sq("d1")));
}

#[test]
fn castling_notation_round_trip() {
    let mut game = GameState::new();
    play(
        &mut game,
        &["e2e4", "e7e5", "Ng1f3", "Nb8c6", "Bf1c4", "Bf8c5", "O-O"],
    );
    let rec = game.move_history().last().unwrap();
    assert_eq!(rec.notation, "O-O");
    assert_eq!(rec.coordinate(), "e1g1");
    assert!(
        game.board()
            .piece_at(sq("f1"))
            .unwrap()
            .is(Color::White, PieceKind::Rook)
    );
}

#[test]
fn promotion_from_move_text() {
    let mut game = GameState::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    play(&mut game, &["b7b8r"]);
    assert_eq!(game.phase(), Phase::AwaitingSelection);
    assert!(
        game.board()
            .piece_at(sq("b8"))
            .unwrap()
            .is(Color::White, PieceKind::Rook)
    );
    assert_eq!(game.outcome(), Outcome::Check(Color::Black));
}

/// Plays a fixed, move-order-driven game and checks that every position
/// reached keeps exactly one king per side and a consistent history.
#[test]
fn long_playout_keeps_invariants() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ];
    for fen in fens {
        let mut game = GameState::from_fen(fen).unwrap();
        for ply in 0..300usize {
            if game.outcome().is_terminal() {
                assert!(matches!(game.phase(), Phase::GameOver(_)));
                break;
            }
            let moves = game.all_legal_moves().unwrap();
            assert!(!moves.is_empty(), "{fen}: no moves but game not over");
            let (from, to) = moves[(ply * 7 + 3) % moves.len()];
            game.apply_move(from, to).unwrap();
            if let Phase::AwaitingPromotion(_) = game.phase() {
                game.promote_pawn(PieceKind::PROMOTIONS[ply % 4]).unwrap();
            }

            for color in [Color::White, Color::Black] {
                let kings = game
                    .board()
                    .pieces_of(color)
                    .filter(|(_, pc)| pc.kind == PieceKind::King)
                    .count();
                assert_eq!(kings, 1, "{fen} ply {ply}");
            }
            assert_eq!(
                game.position_history().len(),
                game.move_history().len() + 1
            );
            assert_eq!(
                game.position_history().last(),
                Some(&game.position_key())
            );
        }
    }
}
