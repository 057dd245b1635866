use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Castling rights as a 4-bit mask. The mask doubles as the index into
/// the Zobrist castling table, so rights are hashed as a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const WHITE_KING: u8 = 1;
    pub const WHITE_QUEEN: u8 = 2;
    pub const BLACK_KING: u8 = 4;
    pub const BLACK_QUEEN: u8 = 8;

    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(15);

    #[inline(always)]
    pub const fn has(self, bits: u8) -> bool {
        self.0 & bits != 0
    }

    #[inline(always)]
    pub fn clear(&mut self, bits: u8) {
        self.0 &= !bits;
    }
}

/// A chess position.
///
/// The mailbox `board` is authoritative; the per-(color, kind) bitboards
/// and the occupancies are kept in sync with it by the piece-placement
/// helpers, as is the Zobrist `key`. `halfmove_clock` counts plies since
/// the last pawn move or capture (fifty-move rule), `fullmove_number`
/// increments after Black's move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub bb: [[Bitboard; 6]; 2],
    pub occ: [Bitboard; 2],
    pub occ_all: Bitboard,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub key: u64,
}

/// Snapshot consumed exactly once by `unmake_move`. Restoring the whole
/// previous position keeps unmake trivially correct for every move kind
/// (promotion, castling, en passant included).
#[derive(Clone, Debug)]
pub struct Undo {
    prev: Position,
}

impl Position {
    fn empty() -> Self {
        Position {
            board: [None; 64],
            bb: [[Bitboard::EMPTY; 6]; 2],
            occ: [Bitboard::EMPTY; 2],
            occ_all: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            key: 0,
        }
    }

    /// The standard initial position.
    pub fn startpos() -> Self {
        let mut p = Position::empty();
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
            let f = f as u8;
            p.board[f as usize] = Some(Piece {
                color: Color::White,
                kind,
            });
            p.board[(56 + f) as usize] = Some(Piece {
                color: Color::Black,
                kind,
            });
            p.board[(8 + f) as usize] = Some(Piece {
                color: Color::White,
                kind: PieceKind::Pawn,
            });
            p.board[(48 + f) as usize] = Some(Piece {
                color: Color::Black,
                kind: PieceKind::Pawn,
            });
        }
        p.castling = CastlingRights::ALL;
        p.rebuild();
        p
    }

    /// Build a position from Forsyth-Edwards Notation.
    ///
    /// Only tests and the front-end use this; malformed input panics.
    pub fn from_fen(fen: &str) -> Self {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        assert!(parts.len() >= 4, "invalid FEN: expected at least 4 fields");

        let mut p = Position::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        assert!(ranks.len() == 8, "invalid FEN board section");
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as i8; // FEN lists rank 8 first
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let color = if ch.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = match ch.to_ascii_lowercase() {
                        'p' => PieceKind::Pawn,
                        'n' => PieceKind::Knight,
                        'b' => PieceKind::Bishop,
                        'r' => PieceKind::Rook,
                        'q' => PieceKind::Queen,
                        'k' => PieceKind::King,
                        _ => panic!("invalid piece char in FEN: {ch}"),
                    };
                    let sq = sq_at(file, rank).expect("square out of bounds in FEN");
                    p.board[sq as usize] = Some(Piece { color, kind });
                    file += 1;
                }
                assert!(file <= 8, "too many files in FEN rank");
            }
            assert!(file == 8, "not enough files in FEN rank");
        }

        p.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => panic!("invalid side to move in FEN: {other}"),
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                p.castling.0 |= match c {
                    'K' => CastlingRights::WHITE_KING,
                    'Q' => CastlingRights::WHITE_QUEEN,
                    'k' => CastlingRights::BLACK_KING,
                    'q' => CastlingRights::BLACK_QUEEN,
                    _ => panic!("invalid castling char in FEN: {c}"),
                };
            }
        }

        p.en_passant = if parts[3] == "-" {
            None
        } else {
            coord_to_sq(parts[3])
        };

        p.halfmove_clock = parts
            .get(4)
            .copied()
            .unwrap_or("0")
            .parse()
            .expect("invalid halfmove clock in FEN");
        p.fullmove_number = parts
            .get(5)
            .copied()
            .unwrap_or("1")
            .parse()
            .expect("invalid fullmove number in FEN");

        p.rebuild();
        p
    }

    /// Rebuild bitboards, occupancies and the key from the mailbox.
    pub fn rebuild(&mut self) {
        self.bb = [[Bitboard::EMPTY; 6]; 2];
        self.occ = [Bitboard::EMPTY; 2];
        for s in 0..64u8 {
            if let Some(pc) = self.board[s as usize] {
                let b = Bitboard::from_square(s);
                self.bb[pc.color.idx()][pc.kind.idx()] |= b;
                self.occ[pc.color.idx()] |= b;
            }
        }
        self.occ_all = self.occ[0] | self.occ[1];
        self.key = self.compute_key();
    }

    /// Hash the position from scratch. `make_move` keeps `key` equal to
    /// this at all times; the equality is checked by tests.
    pub fn compute_key(&self) -> u64 {
        let mut k = 0u64;
        for s in 0..64u8 {
            if let Some(pc) = self.board[s as usize] {
                k ^= ZOBRIST.piece_key(pc, s);
            }
        }
        k ^= ZOBRIST.castling_key(self.castling.0);
        if let Some(ep) = self.en_passant {
            k ^= ZOBRIST.ep_key(file_of(ep));
        }
        if self.side_to_move == Color::Black {
            k ^= ZOBRIST.side_key();
        }
        k
    }

    #[inline(always)]
    pub fn pieces(&self, c: Color, k: PieceKind) -> Bitboard {
        self.bb[c.idx()][k.idx()]
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    #[inline(always)]
    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.pieces(c, PieceKind::King).lsb()
    }

    // Incremental piece placement. Each of these keeps the mailbox, the
    // bitboards, the occupancies and the key consistent in one step.

    fn add_piece(&mut self, sq: u8, pc: Piece) {
        let b = Bitboard::from_square(sq);
        self.board[sq as usize] = Some(pc);
        self.bb[pc.color.idx()][pc.kind.idx()] |= b;
        self.occ[pc.color.idx()] |= b;
        self.occ_all |= b;
        self.key ^= ZOBRIST.piece_key(pc, sq);
    }

    fn remove_piece(&mut self, sq: u8) {
        if let Some(pc) = self.board[sq as usize] {
            let b = Bitboard::from_square(sq);
            self.bb[pc.color.idx()][pc.kind.idx()] &= !b;
            self.occ[pc.color.idx()] &= !b;
            self.occ_all &= !b;
            self.key ^= ZOBRIST.piece_key(pc, sq);
            self.board[sq as usize] = None;
        }
    }

    fn move_piece(&mut self, from: u8, to: u8) {
        if let Some(pc) = self.board[from as usize] {
            let fb = Bitboard::from_square(from);
            let tb = Bitboard::from_square(to);
            self.bb[pc.color.idx()][pc.kind.idx()] ^= fb | tb;
            self.occ[pc.color.idx()] ^= fb | tb;
            self.occ_all ^= fb | tb;
            self.key ^= ZOBRIST.piece_key(pc, from);
            self.key ^= ZOBRIST.piece_key(pc, to);
            self.board[from as usize] = None;
            self.board[to as usize] = Some(pc);
        }
    }

    /// Is `target` attacked by any piece of `by`?
    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        // A pawn of `by` attacks `target` exactly when the pawn sits in
        // the reverse attack set, i.e. where a pawn of the other color
        // standing on `target` would attack.
        if (pawn_attacks(target, by.other()) & self.pieces(by, PieceKind::Pawn)).any() {
            return true;
        }
        if (knight_attacks(target) & self.pieces(by, PieceKind::Knight)).any() {
            return true;
        }
        if (king_attacks(target) & self.pieces(by, PieceKind::King)).any() {
            return true;
        }
        let diag = self.pieces(by, PieceKind::Bishop) | self.pieces(by, PieceKind::Queen);
        if (bishop_attacks(target, self.occ_all) & diag).any() {
            return true;
        }
        let ortho = self.pieces(by, PieceKind::Rook) | self.pieces(by, PieceKind::Queen);
        if (rook_attacks(target, self.occ_all) & ortho).any() {
            return true;
        }
        false
    }

    pub fn in_check(&self, side: Color) -> bool {
        match self.king_sq(side) {
            Some(ks) => self.is_square_attacked(ks, side.other()),
            None => false,
        }
    }

    /// Does `c` have anything beyond pawns and king? Null-move pruning
    /// is unsound in pawn endgames, so the search asks this first.
    pub fn has_non_pawn_material(&self, c: Color) -> bool {
        (self.pieces(c, PieceKind::Knight)
            | self.pieces(c, PieceKind::Bishop)
            | self.pieces(c, PieceKind::Rook)
            | self.pieces(c, PieceKind::Queen))
        .any()
    }

    /// Apply `mv`, mutating the position in place.
    ///
    /// The steps run in a fixed order so that the incremental key stays
    /// equal to `compute_key` at every point: drop the stale en-passant
    /// hash first, then captures and castling rights, then the piece
    /// movement itself, then the new en-passant square, clocks and the
    /// side flip.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let undo = Undo { prev: self.clone() };

        let from = mv.from();
        let to = mv.to();
        let us = self.side_to_move;
        let moved = self.board[from as usize].expect("no piece on from-square");
        let mut captured = self.board[to as usize];

        if let Some(ep) = self.en_passant {
            self.key ^= ZOBRIST.ep_key(file_of(ep));
        }
        self.en_passant = None;

        let old_castling = self.castling;

        if mv.is_en_passant() {
            let cap_sq = match us {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            captured = self.board[cap_sq as usize];
            self.remove_piece(cap_sq);
        }

        // A king move loses both rights, a rook move from its corner the
        // matching one, and capturing a rook on its corner takes the
        // victim's right away.
        if moved.kind == PieceKind::King {
            match us {
                Color::White => self
                    .castling
                    .clear(CastlingRights::WHITE_KING | CastlingRights::WHITE_QUEEN),
                Color::Black => self
                    .castling
                    .clear(CastlingRights::BLACK_KING | CastlingRights::BLACK_QUEEN),
            }
        }
        if moved.kind == PieceKind::Rook {
            match from {
                0 => self.castling.clear(CastlingRights::WHITE_QUEEN),
                7 => self.castling.clear(CastlingRights::WHITE_KING),
                56 => self.castling.clear(CastlingRights::BLACK_QUEEN),
                63 => self.castling.clear(CastlingRights::BLACK_KING),
                _ => {}
            }
        }
        if let Some(victim) = captured
            && victim.kind == PieceKind::Rook
        {
            match (victim.color, to) {
                (Color::White, 0) => self.castling.clear(CastlingRights::WHITE_QUEEN),
                (Color::White, 7) => self.castling.clear(CastlingRights::WHITE_KING),
                (Color::Black, 56) => self.castling.clear(CastlingRights::BLACK_QUEEN),
                (Color::Black, 63) => self.castling.clear(CastlingRights::BLACK_KING),
                _ => {}
            }
        }

        if old_castling != self.castling {
            self.key ^= ZOBRIST.castling_key(old_castling.0);
            self.key ^= ZOBRIST.castling_key(self.castling.0);
        }

        if !mv.is_en_passant() && captured.is_some() {
            self.remove_piece(to);
        }

        if mv.is_promotion() {
            self.remove_piece(from);
            self.add_piece(
                to,
                Piece {
                    color: us,
                    kind: mv.promo().unwrap_or(PieceKind::Queen),
                },
            );
        } else {
            self.move_piece(from, to);
        }

        if mv.is_king_castle() {
            match us {
                Color::White => self.move_piece(7, 5),
                Color::Black => self.move_piece(63, 61),
            }
        } else if mv.is_queen_castle() {
            match us {
                Color::White => self.move_piece(0, 3),
                Color::Black => self.move_piece(56, 59),
            }
        }

        if moved.kind == PieceKind::Pawn {
            let double = match us {
                Color::White => rank_of(from) == 1 && rank_of(to) == 3,
                Color::Black => rank_of(from) == 6 && rank_of(to) == 4,
            };
            if double {
                let ep = (from + to) / 2;
                self.en_passant = Some(ep);
                self.key ^= ZOBRIST.ep_key(file_of(ep));
            }
        }

        if moved.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = us.other();
        self.key ^= ZOBRIST.side_key();

        undo
    }

    /// Restore the position saved by the matching `make_move`.
    pub fn unmake_move(&mut self, undo: Undo) {
        *self = undo.prev;
    }

    /// Pass the turn without moving: only the en-passant square, the
    /// side to move and the key change. The fifty-move clock is left
    /// untouched.
    pub fn make_null_move(&mut self) -> Undo {
        let undo = Undo { prev: self.clone() };
        if let Some(ep) = self.en_passant {
            self.key ^= ZOBRIST.ep_key(file_of(ep));
        }
        self.en_passant = None;
        self.side_to_move = self.side_to_move.other();
        self.key ^= ZOBRIST.side_key();
        undo
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
