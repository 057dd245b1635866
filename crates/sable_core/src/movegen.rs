//! Pseudo-legal move generation.
//!
//! Moves are generated from bitboards and may leave the own king in
//! check; callers filter with `is_legal` (make, test check, unmake) or
//! use `legal_moves_into`. The `CapturesOnly` mode feeds quiescence
//! search: captures, capture-promotions and en passant, no quiet moves
//! and no castling.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::position::{CastlingRights, Position};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenMode {
    All,
    CapturesOnly,
}

/// Generate pseudo-legal moves into a fresh vector.
pub fn generate_moves(pos: &Position, mode: GenMode) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    generate_moves_into(pos, mode, &mut out);
    out
}

/// Generate pseudo-legal moves into `out`, reusing its allocation.
pub fn generate_moves_into(pos: &Position, mode: GenMode, out: &mut Vec<Move>) {
    out.clear();
    let us = pos.side_to_move;
    let occ = pos.occ_all;

    gen_pawn_moves(pos, us, mode, out);
    gen_piece_moves(pos, us, PieceKind::Knight, mode, knight_attacks, out);
    gen_piece_moves(pos, us, PieceKind::Bishop, mode, |s| bishop_attacks(s, occ), out);
    gen_piece_moves(pos, us, PieceKind::Rook, mode, |s| rook_attacks(s, occ), out);
    gen_piece_moves(pos, us, PieceKind::Queen, mode, |s| queen_attacks(s, occ), out);
    gen_piece_moves(pos, us, PieceKind::King, mode, king_attacks, out);
    if mode == GenMode::All {
        gen_castling_moves(pos, us, out);
    }
}

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, filtering
/// pseudo-legal moves in place by playing them on the mutable position.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    generate_moves_into(pos, GenMode::All, out);
    out.retain(|&mv| is_legal(pos, mv));
}

/// Does `mv` leave the mover's king safe? Checked by make + unmake; the
/// position is unchanged on return.
pub fn is_legal(pos: &mut Position, mv: Move) -> bool {
    let mover = pos.side_to_move;
    let undo = pos.make_move(mv);
    let ok = !pos.in_check(mover);
    pos.unmake_move(undo);
    ok
}

type ShiftFn = fn(Bitboard) -> Bitboard;

fn gen_pawn_moves(pos: &Position, us: Color, mode: GenMode, out: &mut Vec<Move>) {
    let pawns = pos.pieces(us, PieceKind::Pawn);
    let opp = pos.occ[us.other().idx()];
    let empty = !pos.occ_all;

    let (push, start_rank, promo_rank, double_rank): (ShiftFn, Bitboard, Bitboard, Bitboard) =
        match us {
            Color::White => (
                Bitboard::north,
                Bitboard::RANK_2,
                Bitboard::RANK_8,
                Bitboard::RANK_4,
            ),
            Color::Black => (
                Bitboard::south,
                Bitboard::RANK_7,
                Bitboard::RANK_1,
                Bitboard::RANK_5,
            ),
        };
    let back: i8 = match us {
        Color::White => -8,
        Color::Black => 8,
    };

    if mode == GenMode::All {
        let single = push(pawns) & empty;

        let mut quiet = single & !promo_rank;
        while let Some(to) = quiet.pop_lsb() {
            out.push(Move::new((to as i8 + back) as u8, to, 0));
        }

        let mut promo = single & promo_rank;
        while let Some(to) = promo.pop_lsb() {
            add_promotions((to as i8 + back) as u8, to, 0, out);
        }

        let first = push(pawns & start_rank) & empty;
        let mut double = push(first) & empty & double_rank;
        while let Some(to) = double.pop_lsb() {
            out.push(Move::new((to as i8 + 2 * back) as u8, to, 0));
        }
    }

    // Captures and en passant are generated in both modes.
    let (left, right): (ShiftFn, ShiftFn) = match us {
        Color::White => (Bitboard::north_west, Bitboard::north_east),
        Color::Black => (Bitboard::south_west, Bitboard::south_east),
    };
    let (back_left, back_right): (i8, i8) = match us {
        Color::White => (-7, -9),
        Color::Black => (9, 7),
    };

    for (shift, back_off) in [(left, back_left), (right, back_right)] {
        let attacked = shift(pawns);

        let mut caps = attacked & opp & !promo_rank;
        while let Some(to) = caps.pop_lsb() {
            out.push(Move::new((to as i8 + back_off) as u8, to, Move::CAPTURE));
        }

        let mut promo_caps = attacked & opp & promo_rank;
        while let Some(to) = promo_caps.pop_lsb() {
            add_promotions((to as i8 + back_off) as u8, to, Move::CAPTURE, out);
        }

        if let Some(ep) = pos.en_passant
            && attacked.contains(ep)
        {
            out.push(Move::new(
                (ep as i8 + back_off) as u8,
                ep,
                Move::CAPTURE | Move::EN_PASSANT,
            ));
        }
    }
}

/// Every promotion push or capture fans out into the four choices.
fn add_promotions(from: u8, to: u8, flags: u32, out: &mut Vec<Move>) {
    for kind in [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ] {
        out.push(Move::promotion(from, to, kind, flags));
    }
}

fn gen_piece_moves(
    pos: &Position,
    us: Color,
    kind: PieceKind,
    mode: GenMode,
    attacks: impl Fn(u8) -> Bitboard,
    out: &mut Vec<Move>,
) {
    let own = pos.occ[us.idx()];
    let opp = pos.occ[us.other().idx()];
    let mask = match mode {
        GenMode::All => !own,
        GenMode::CapturesOnly => opp,
    };

    let mut pieces = pos.pieces(us, kind);
    while let Some(from) = pieces.pop_lsb() {
        let mut targets = attacks(from) & mask;
        while let Some(to) = targets.pop_lsb() {
            let flags = if opp.contains(to) { Move::CAPTURE } else { 0 };
            out.push(Move::new(from, to, flags));
        }
    }
}

fn gen_castling_moves(pos: &Position, us: Color, out: &mut Vec<Move>) {
    // Castling out of check is never legal; the rook transit square
    // (b1/b8) may be attacked, only the king's path matters.
    if pos.in_check(us) {
        return;
    }
    let occ = pos.occ_all;
    let them = us.other();

    match us {
        Color::White => {
            if pos.castling.has(CastlingRights::WHITE_KING)
                && (occ & Bitboard(0x60)).is_empty() // f1, g1
                && !pos.is_square_attacked(5, them)
                && !pos.is_square_attacked(6, them)
            {
                out.push(Move::new(4, 6, Move::KING_CASTLE));
            }
            if pos.castling.has(CastlingRights::WHITE_QUEEN)
                && (occ & Bitboard(0x0E)).is_empty() // b1, c1, d1
                && !pos.is_square_attacked(3, them)
                && !pos.is_square_attacked(2, them)
            {
                out.push(Move::new(4, 2, Move::QUEEN_CASTLE));
            }
        }
        Color::Black => {
            if pos.castling.has(CastlingRights::BLACK_KING)
                && (occ & Bitboard(0x6000000000000000)).is_empty() // f8, g8
                && !pos.is_square_attacked(61, them)
                && !pos.is_square_attacked(62, them)
            {
                out.push(Move::new(60, 62, Move::KING_CASTLE));
            }
            if pos.castling.has(CastlingRights::BLACK_QUEEN)
                && (occ & Bitboard(0x0E00000000000000)).is_empty() // b8, c8, d8
                && !pos.is_square_attacked(59, them)
                && !pos.is_square_attacked(58, them)
            {
                out.push(Move::new(60, 58, Move::QUEEN_CASTLE));
            }
        }
    }
}
