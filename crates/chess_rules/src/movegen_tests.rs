use super::*;

fn targets(fen: &str, from: &str) -> Vec<Square> {
    let pos = Position::from_fen(fen).unwrap();
    let mut t = pseudo_legal_targets(&pos, sq(from));
    t.sort();
    t
}

fn squares(names: &[&str]) -> Vec<Square> {
    let mut v: Vec<Square> = names.iter().map(|n| sq(n)).collect();
    v.sort();
    v
}

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn test_startpos_targets() {
    assert_eq!(targets(START, "g1"), squares(&["f3", "h3"]));
    assert_eq!(targets(START, "e2"), squares(&["e3", "e4"]));
    assert_eq!(targets(START, "e7"), squares(&["e6", "e5"]));
    assert!(targets(START, "a1").is_empty());
    assert!(targets(START, "d1").is_empty());
    assert!(targets(START, "e1").is_empty());
    assert!(targets(START, "e4").is_empty());
}

#[test]
fn test_pawn_blocked() {
    assert!(targets("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1", "e2").is_empty());
    assert_eq!(
        targets("4k3/8/8/8/4p3/8/4P3/4K3 w - - 0 1", "e2"),
        squares(&["e3"])
    );
}

#[test]
fn test_pawn_captures_only_enemies() {
    assert_eq!(
        targets("4k3/8/8/8/8/3p1N2/4P3/4K3 w - - 0 1", "e2"),
        squares(&["d3", "e3", "e4"])
    );
}

#[test]
fn test_pawn_double_push_only_from_start_rank() {
    assert_eq!(
        targets("4k3/8/8/8/8/4P3/8/4K3 w - - 0 1", "e3"),
        squares(&["e4"])
    );
}

#[test]
fn test_en_passant_requires_target_square() {
    assert_eq!(
        targets("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5"),
        squares(&["d6", "e6"])
    );
    assert_eq!(
        targets("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1", "e5"),
        squares(&["e6"])
    );
}

#[test]
fn test_en_passant_for_black_looks_the_other_way() {
    assert_eq!(
        targets("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1", "e4"),
        squares(&["d3", "e3"])
    );
}

#[test]
fn test_en_passant_needs_eligible_pawn() {
    let mut pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    if let Some(pc) = pos.board.piece_mut(sq("d5")) {
        pc.en_passant_eligible = false;
    }
    assert_eq!(pseudo_legal_targets(&pos, sq("e5")), vec![sq("e6")]);
}

#[test]
fn test_sliders_stop_at_first_piece() {
    assert_eq!(
        targets("4k3/8/8/8/1p6/8/3P4/R3K3 w - - 0 1", "a1"),
        squares(&["a2", "a3", "a4", "a5", "a6", "a7", "a8", "b1", "c1", "d1"])
    );
    assert_eq!(
        targets("4k3/8/8/8/8/8/1p6/B3K3 w - - 0 1", "a1"),
        squares(&["b2"])
    );
    assert_eq!(targets("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1", "a1").len(), 17);
}

#[test]
fn test_knight_skips_own_pieces() {
    assert_eq!(
        targets("4k3/8/8/8/8/5P2/8/4K1N1 w - - 0 1", "g1"),
        squares(&["e2", "h3"])
    );
}

#[test]
fn test_king_avoids_attacked_squares() {
    assert_eq!(
        targets("4k3/8/8/8/8/8/r7/4K3 w - - 0 1", "e1"),
        squares(&["d1", "f1"])
    );
}

#[test]
fn test_king_cannot_step_back_along_checking_ray() {
    assert_eq!(
        targets("4k3/8/8/8/8/8/8/r3K3 w - - 0 1", "e1"),
        squares(&["d2", "e2", "f2"])
    );
}

#[test]
fn test_castling_both_sides() {
    assert_eq!(
        targets("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1"),
        squares(&["c1", "d1", "d2", "e2", "f1", "f2", "g1"])
    );
    assert_eq!(
        targets("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8"),
        squares(&["c8", "d8", "d7", "e7", "f8", "f7", "g8"])
    );
}

#[test]
fn test_castling_needs_empty_path() {
    let t = targets("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1", "e1");
    assert!(!t.contains(&sq("c1")));
    assert!(t.contains(&sq("g1")));
}

#[test]
fn test_castling_needs_right() {
    let t = targets("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1", "e1");
    assert!(!t.contains(&sq("c1")));
    assert!(t.contains(&sq("g1")));
}

#[test]
fn test_no_castling_out_of_check() {
    let t = targets("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1", "e1");
    assert!(!t.contains(&sq("c1")));
    assert!(!t.contains(&sq("g1")));
}

#[test]
fn test_attacked_b_file_does_not_stop_queenside() {
    // Only the squares the king crosses matter; b1 may be attacked.
    let t = targets("1r2k2r/8/8/8/8/8/8/R3K2R w KQk - 0 1", "e1");
    assert!(t.contains(&sq("c1")));
}

#[test]
fn test_targets_are_on_board() {
    let pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
        .unwrap();
    for from in Square::all() {
        for to in pseudo_legal_targets(&pos, from) {
            assert_eq!(Square::new(to.rank(), to.file()), Some(to));
            assert_ne!(to, from);
        }
    }
}
