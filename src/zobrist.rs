//! Zobrist key table for incremental position hashing.
//!
//! The table holds 781 pseudorandom 64-bit keys: one per (piece, square)
//! pair, one for the side to move, one per castling-right flag and one
//! per en passant file. A position's hash is the XOR of the keys for
//! every feature present in it, so applying or reverting a move only
//! XORs the keys of the features it touched.
//!
//! Keys are drawn once from a seeded generator when the table is built.
//! The table is immutable afterwards and is meant to be wrapped in an
//! [`Arc`](std::sync::Arc) shared by every [`Board`](crate::Board) that
//! must produce comparable hashes. The seed is recorded so a run can be
//! reproduced exactly.

use std::fmt;

use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::{CastlingRights, CastlingSide, Color, File, Piece, Square};

/// Seed used by [`Zobrist::new`].
pub const DEFAULT_SEED: u64 = 0x800d_ba5e_5eed_1234;

pub struct Zobrist {
    seed: u64,
    pieces: [[u64; 64]; 12],
    side: u64,
    castling: [u64; 4],
    enpassant: [u64; 8],
}

impl Zobrist {
    pub fn from_seed(seed: u64) -> Zobrist {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut pieces = [[0_u64; 64]; 12];
        for square_keys in &mut pieces {
            for key in square_keys.iter_mut() {
                *key = rng.next_u64();
            }
        }
        let side = rng.next_u64();
        let mut castling = [0_u64; 4];
        for key in &mut castling {
            *key = rng.next_u64();
        }
        let mut enpassant = [0_u64; 8];
        for key in &mut enpassant {
            *key = rng.next_u64();
        }
        Zobrist {
            seed,
            pieces,
            side,
            castling,
            enpassant,
        }
    }

    pub fn new() -> Zobrist {
        Self::from_seed(DEFAULT_SEED)
    }

    /// Seed the key table was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Key for `piece` standing on `square`. `piece` must not be
    /// [`Piece::NONE`].
    pub fn piece(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.index() - 1][square.index()]
    }

    /// Key XOR-ed in when Black is to move.
    pub fn side(&self) -> u64 {
        self.side
    }

    pub fn castling_right(&self, c: Color, s: CastlingSide) -> u64 {
        self.castling[((c as usize) << 1) | s as usize]
    }

    /// XOR of the keys for every right that differs between `old` and
    /// `new`. XOR-ing this into a hash moves it from one rights state to
    /// the other.
    pub fn castling_delta(&self, old: CastlingRights, new: CastlingRights) -> u64 {
        let mut delta = 0;
        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::Queen, CastlingSide::King] {
                if old.has(color, side) != new.has(color, side) {
                    delta ^= self.castling_right(color, side);
                }
            }
        }
        delta
    }

    /// Key for an en passant target on the given file.
    pub fn enpassant(&self, file: File) -> u64 {
        self.enpassant[file.index()]
    }
}

impl fmt::Debug for Zobrist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("Zobrist")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for Zobrist {
    fn default() -> Zobrist {
        Zobrist::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_reproducible() {
        let a = Zobrist::from_seed(42);
        let b = Zobrist::from_seed(42);
        let c = Zobrist::from_seed(43);
        assert_eq!(a.seed(), 42);
        for piece in Piece::iter().filter(|p| p.is_some()) {
            for sq in Square::iter() {
                assert_eq!(a.piece(piece, sq), b.piece(piece, sq));
            }
        }
        assert_eq!(a.side(), b.side());
        assert_ne!(a.side(), c.side());
    }

    #[test]
    fn test_keys_distinct() {
        let table = Zobrist::new();
        let mut seen = HashSet::new();
        for piece in Piece::iter().filter(|p| p.is_some()) {
            for sq in Square::iter() {
                assert!(seen.insert(table.piece(piece, sq)));
            }
        }
        assert!(seen.insert(table.side()));
        for color in [Color::White, Color::Black] {
            for side in [CastlingSide::Queen, CastlingSide::King] {
                assert!(seen.insert(table.castling_right(color, side)));
            }
        }
        for file in File::iter() {
            assert!(seen.insert(table.enpassant(file)));
        }
        assert_eq!(seen.len(), 781);
    }

    #[test]
    fn test_castling_delta() {
        let table = Zobrist::new();
        assert_eq!(
            table.castling_delta(CastlingRights::FULL, CastlingRights::FULL),
            0
        );
        let mut partial = CastlingRights::FULL;
        partial.unset(Color::White, CastlingSide::King);
        assert_eq!(
            table.castling_delta(CastlingRights::FULL, partial),
            table.castling_right(Color::White, CastlingSide::King)
        );
    }
}
