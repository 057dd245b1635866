//! Board representation and move generation for the Sable chess engine.
//!
//! This crate is the rules layer: bitboard position with incremental
//! Zobrist hashing, pseudo-legal move generation with a legality filter,
//! snapshot-based make/unmake, perft, coordinate notation and the shared
//! search-limit plumbing. Evaluation and search live in `sable_engine`.

pub mod attacks;
pub mod bitboard;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod position;
pub mod time_control;
pub mod types;
pub mod zobrist;

pub use attacks::*;
pub use bitboard::Bitboard;
pub use movegen::*;
pub use notation::{move_to_str, parse_move};
pub use perft::perft;
pub use position::{CastlingRights, Position, Undo};
pub use time_control::{SearchLimits, TimeControl};
pub use types::*;
pub use zobrist::ZOBRIST;
