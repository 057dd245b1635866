use super::*;
use sable_core::Piece;

/// Mirror a position across the horizontal axis, swapping colors,
/// castling rights and the side to move. The evaluation of the mirror
/// must be the exact negation of the original.
fn mirror(pos: &Position) -> Position {
    let mut m = pos.clone();
    m.board = [None; 64];
    for s in 0..64usize {
        if let Some(pc) = pos.board[s] {
            m.board[s ^ 56] = Some(Piece {
                color: pc.color.other(),
                kind: pc.kind,
            });
        }
    }
    m.side_to_move = pos.side_to_move.other();
    m.castling.0 = ((pos.castling.0 & 3) << 2) | ((pos.castling.0 >> 2) & 3);
    m.en_passant = pos.en_passant.map(|e| e ^ 56);
    m.rebuild();
    m
}

#[test]
fn test_startpos_is_balanced() {
    assert_eq!(evaluate(&Position::startpos()), 0);
}

#[test]
fn test_deterministic() {
    let pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -");
    assert_eq!(evaluate(&pos), evaluate(&pos));
}

#[test]
fn test_side_to_move_perspective() {
    // Same board, opposite movers: the scores are exact negations
    let w = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    let b = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
    assert_eq!(evaluate(&w), -evaluate(&b));
    assert!(evaluate(&w) > 0, "a rook up should evaluate positive");
    assert!(evaluate(&b) < 0);
}

#[test]
fn test_material_dominates() {
    // White is a queen up; the score should be at least half of one
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1");
    assert!(evaluate(&pos) > 450);
}

#[test]
fn test_mirror_symmetry() {
    // Queenless positions with pawns, minors, rooks, castled and
    // central kings; the mirror must score the exact negation
    let fens = [
        "4k3/8/8/8/8/8/8/R3K3 w - - 0 1",
        "r1b1kb1r/pppp1ppp/2n2n2/4p3/4P3/2N2N2/PPPP1PPP/R1B1KB1R w KQkq - 0 1",
        "6k1/5ppp/8/8/3P4/8/5PPP/6K1 w - - 0 1",
        "2r3k1/pp3pp1/4pn1p/8/2PR4/1P3N2/P4PPP/6K1 b - - 0 1",
        "8/3k4/3p4/8/3P4/3K4/8/8 w - - 0 1",
    ];
    for fen in fens {
        let pos = Position::from_fen(fen);
        let mirrored = mirror(&pos);
        assert_eq!(
            evaluate(&pos),
            -evaluate(&mirrored),
            "mirror asymmetry for {fen}"
        );
    }
}

#[test]
fn test_doubled_pawns_penalized() {
    let single = Position::from_fen("4k3/8/8/8/8/3P4/8/4K3 w - - 0 1");
    let doubled = Position::from_fen("4k3/8/8/8/8/3P4/3P4/4K3 w - - 0 1");
    let sq = 19; // d3 pawn, present in both

    let (mg_single, _) = eval_pawn(
        &single,
        Color::White,
        sq,
        &pawn_file_counts(&single)[Color::White.idx()],
    );
    let (mg_doubled, _) = eval_pawn(
        &doubled,
        Color::White,
        sq,
        &pawn_file_counts(&doubled)[Color::White.idx()],
    );
    assert!(mg_doubled < mg_single);
}

#[test]
fn test_isolated_pawn_penalized() {
    let supported = Position::from_fen("4k3/8/8/8/8/3P4/4P3/4K3 w - - 0 1");
    let isolated = Position::from_fen("4k3/8/8/8/8/3P4/8/4K3 w - - 0 1");
    let sq = 19; // d3

    let (mg_sup, eg_sup) = eval_pawn(
        &supported,
        Color::White,
        sq,
        &pawn_file_counts(&supported)[Color::White.idx()],
    );
    let (mg_iso, eg_iso) = eval_pawn(
        &isolated,
        Color::White,
        sq,
        &pawn_file_counts(&isolated)[Color::White.idx()],
    );
    assert!(mg_iso < mg_sup);
    assert!(eg_iso < eg_sup);
}

#[test]
fn test_passed_pawn_bonus_grows_with_rank() {
    let d5 = Position::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1");
    let d7 = Position::from_fen("4k3/3P4/8/8/8/8/8/4K3 w - - 0 1");
    let files_d5 = pawn_file_counts(&d5)[Color::White.idx()];
    let files_d7 = pawn_file_counts(&d7)[Color::White.idx()];

    let (_, eg_d5) = eval_pawn(&d5, Color::White, 35, &files_d5);
    let (_, eg_d7) = eval_pawn(&d7, Color::White, 51, &files_d7);
    assert!(eg_d7 > eg_d5, "further advanced passer must be worth more");
}

#[test]
fn test_blocked_file_is_not_passed() {
    // Enemy pawn directly ahead on the file: no passer bonus at all
    let blocked = Position::from_fen("4k3/3p4/8/3P4/8/8/8/4K3 w - - 0 1");
    let files = pawn_file_counts(&blocked)[Color::White.idx()];
    let (mg, eg) = eval_pawn(&blocked, Color::White, 35, &files);

    let free = Position::from_fen("4k3/7p/8/3P4/8/8/8/4K3 w - - 0 1");
    let files_free = pawn_file_counts(&free)[Color::White.idx()];
    let (mg_free, eg_free) = eval_pawn(&free, Color::White, 35, &files_free);

    assert!(mg_free > mg);
    assert!(eg_free > eg);
}

#[test]
fn test_phase_bounds() {
    assert_eq!(game_phase(&Position::startpos()), 24);
    assert_eq!(
        game_phase(&Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1")),
        0
    );
    assert_eq!(
        game_phase(&Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1")),
        4
    );
}
