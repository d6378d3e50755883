//! Chess position engine built on a flat mailbox board.
//!
//! The crate keeps a position in a 64-slot array of compact piece
//! scalars and derives everything else on demand: pseudo-legal and
//! legal move generation, attack queries, reversible make/unmake with
//! an internal history stack, and an incrementally maintained Zobrist
//! hash suitable for transposition keys.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wrenchess::{Board, Zobrist};
//!
//! let keys = Arc::new(Zobrist::new());
//! let mut board = Board::initial(keys);
//! board.make_uci("e2e4").unwrap();
//! board.make_uci("e7e5").unwrap();
//! assert_eq!(
//!     board.as_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
//! );
//! let _ = board.unmake();
//! assert_eq!(board.perft(2), 600);
//! ```
//!
//! # Hashing and sharing
//!
//! Zobrist keys live in a [`Zobrist`] table generated from a recorded
//! seed and shared between boards through an [`Arc`](std::sync::Arc).
//! Hashes are only comparable between boards built from the same table.
//! A `Board` itself is a single-writer structure; clone it to explore
//! variations in parallel.

mod board;
mod geometry;
mod movegen;
mod moves;
mod perft;
mod types;
mod zobrist;

pub use board::{
    Board, CellsParseError, FenParseError, RawBoard, RawFenParseError, ValidateError,
};
pub use movegen::MoveList;
pub use moves::{IllegalMoveError, Move, MoveParseError, UciListError, UciMoveError};
pub use types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Color, ColorParseError, File, Piece,
    PieceKind, Rank, Square, SquareParseError,
};
pub use zobrist::{Zobrist, DEFAULT_SEED};
