//! Moves and the make/unmake engine.
//!
//! A [`Move`] stores only source, destination and an optional promotion
//! kind. Whether a move is a castle or an en passant capture is derived
//! geometrically when it is applied: a king travelling two files along
//! its home rank is castling, a pawn stepping diagonally onto an empty
//! square is capturing en passant. The derived class is recorded in the
//! [`Undo`] frame so unmake reverts exactly what make did.
//!
//! [`Board::make_unchecked`] trusts its input to be pseudo-legal and is
//! the primitive the legality filter and perft drive. The public
//! [`Board::make`] validates against the legal move set first and leaves
//! the board untouched on failure.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::board::Board;
use crate::geometry;
use crate::types::{
    CastlingRights, CastlingSide, Color, File, Piece, PieceKind, Square, SquareParseError,
};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid string length")]
    BadLength,
    #[error("bad source square: {0}")]
    BadSrc(SquareParseError),
    #[error("bad destination square: {0}")]
    BadDst(SquareParseError),
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("move {0} is not legal")]
pub struct IllegalMoveError(pub Move);

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum UciMoveError {
    #[error("cannot parse move: {0}")]
    Parse(#[from] MoveParseError),
    #[error("{0}")]
    Illegal(#[from] IllegalMoveError),
}

/// Error applying a whitespace-separated list of UCI moves.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("bad move #{}: {}", .pos + 1, .source)]
pub struct UciListError {
    pub pos: usize,
    #[source]
    pub source: UciMoveError,
}

/// Move in pure coordinate form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: Square,
    pub dst: Square,
    pub promote: Option<PieceKind>,
}

impl Move {
    pub const fn new(src: Square, dst: Square) -> Move {
        Move {
            src,
            dst,
            promote: None,
        }
    }

    pub const fn with_promote(src: Square, dst: Square, promote: PieceKind) -> Move {
        Move {
            src,
            dst,
            promote: Some(promote),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(kind) = self.promote {
            write!(f, "{}", kind.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !matches!(s.len(), 4 | 5) {
            return Err(MoveParseError::BadLength);
        }
        let src = Square::from_str(&s[0..2]).map_err(MoveParseError::BadSrc)?;
        let dst = Square::from_str(&s[2..4]).map_err(MoveParseError::BadDst)?;
        let promote = match s.as_bytes().get(4) {
            Some(&b) => {
                let kind = PieceKind::from_char(b as char)
                    .filter(|k| !matches!(k, PieceKind::Pawn | PieceKind::King))
                    .ok_or(MoveParseError::BadPromote(b as char))?;
                Some(kind)
            }
            None => None,
        };
        Ok(Move { src, dst, promote })
    }
}

/// How a move actually played out on the board, derived at apply time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MoveClass {
    Simple,
    Castling(CastlingSide),
    Enpassant,
}

/// Everything make must remember so unmake can restore the previous
/// state exactly.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Undo {
    pub(crate) captured: Piece,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_target: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) special: MoveClass,
}

/// Square the rook lands on after castling.
fn rook_castle_dst(c: Color, side: CastlingSide) -> Square {
    let file = match side {
        CastlingSide::Queen => File::D,
        CastlingSide::King => File::F,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

fn enpassant_victim(mv: Move) -> Square {
    Square::from_parts(mv.dst.file(), mv.src.rank())
}

impl Board {
    /// XOR mask moving the hash between the states before and after
    /// `mv`. Built only from the move, the undo frame and the two
    /// metadata snapshots, so make and unmake apply the identical mask.
    fn hash_delta(
        &self,
        mv: Move,
        color: Color,
        moved: Piece,
        undo: &Undo,
        new_castling: CastlingRights,
        new_ep: Option<Square>,
    ) -> u64 {
        let keys = &self.keys;
        let placed = match mv.promote {
            Some(kind) => Piece::from_parts(color, kind),
            None => moved,
        };
        let mut delta = keys.piece(moved, mv.src) ^ keys.piece(placed, mv.dst) ^ keys.side();
        if undo.captured.is_some() {
            let capture_sq = match undo.special {
                MoveClass::Enpassant => enpassant_victim(mv),
                _ => mv.dst,
            };
            delta ^= keys.piece(undo.captured, capture_sq);
        }
        if let MoveClass::Castling(side) = undo.special {
            let rook = Piece::from_parts(color, PieceKind::Rook);
            delta ^= keys.piece(rook, geometry::rook_home(color, side));
            delta ^= keys.piece(rook, rook_castle_dst(color, side));
        }
        delta ^= keys.castling_delta(undo.castling, new_castling);
        if let Some(ep) = undo.ep_target {
            delta ^= keys.enpassant(ep.file());
        }
        if let Some(ep) = new_ep {
            delta ^= keys.enpassant(ep.file());
        }
        delta
    }

    /// Applies `mv` without any legality checks and pushes an undo frame
    /// onto the history. `mv` must be pseudo-legal for the side to move;
    /// anything else corrupts the position.
    pub(crate) fn make_unchecked(&mut self, mv: Move) {
        let moved = self.r.get(mv.src);
        let color = self.r.side;

        let special = if moved.is(color, PieceKind::King)
            && mv.src.rank() == mv.dst.rank()
            && mv.src.file().index().abs_diff(mv.dst.file().index()) == 2
        {
            MoveClass::Castling(if mv.dst.file() > mv.src.file() {
                CastlingSide::King
            } else {
                CastlingSide::Queen
            })
        } else if moved.is(color, PieceKind::Pawn)
            && mv.src.file() != mv.dst.file()
            && self.r.get(mv.dst).is_none()
        {
            MoveClass::Enpassant
        } else {
            MoveClass::Simple
        };

        let capture_sq = match special {
            MoveClass::Enpassant => enpassant_victim(mv),
            _ => mv.dst,
        };
        let captured = self.r.get(capture_sq);
        let undo = Undo {
            captured,
            castling: self.r.castling,
            ep_target: self.r.ep_target,
            halfmove_clock: self.r.halfmove_clock,
            special,
        };

        let new_ep = if moved.is(color, PieceKind::Pawn)
            && mv.src.file() == mv.dst.file()
            && mv.src.manhattan(mv.dst) == 2
        {
            Some(Square::from_index((mv.src.index() + mv.dst.index()) / 2))
        } else {
            None
        };

        let mut new_castling = self.r.castling;
        if moved.kind() == Some(PieceKind::King) {
            new_castling.unset_color(color);
        }
        // A rook leaving its corner or anything landing there kills the
        // corresponding right, whether or not a rook still stands there.
        for c in [Color::White, Color::Black] {
            for s in [CastlingSide::Queen, CastlingSide::King] {
                let home = geometry::rook_home(c, s);
                if mv.src == home || mv.dst == home {
                    new_castling.unset(c, s);
                }
            }
        }

        let placed = match mv.promote {
            Some(kind) => Piece::from_parts(color, kind),
            None => moved,
        };
        self.r.put(mv.src, Piece::NONE);
        if special == MoveClass::Enpassant {
            self.r.put(capture_sq, Piece::NONE);
        }
        self.r.put(mv.dst, placed);
        if let MoveClass::Castling(side) = special {
            let rook = Piece::from_parts(color, PieceKind::Rook);
            self.r.put(geometry::rook_home(color, side), Piece::NONE);
            self.r.put(rook_castle_dst(color, side), rook);
        }

        let delta = self.hash_delta(mv, color, moved, &undo, new_castling, new_ep);
        self.hash ^= delta;

        self.r.castling = new_castling;
        self.r.ep_target = new_ep;
        self.r.halfmove_clock = if captured.is_some() || moved.kind() == Some(PieceKind::Pawn) {
            0
        } else {
            // FEN accepts any u16 clock, so a quiet move may start at the max.
            self.r.halfmove_clock.saturating_add(1)
        };
        self.r.side = color.inv();
        if color == Color::Black {
            self.r.move_number += 1;
        }
        self.history.push((mv, undo));
    }

    /// Reverts the most recent move and returns it.
    ///
    /// # Panics
    ///
    /// Panics if no move has been made on this board. Calling unmake
    /// past the bottom of the history is a caller bug, not a
    /// recoverable condition.
    pub fn unmake(&mut self) -> Move {
        let (mv, undo) = self
            .history
            .pop()
            .expect("unmake called with empty history");
        let color = self.r.side.inv();
        let placed = self.r.get(mv.dst);
        let moved = match mv.promote {
            Some(_) => Piece::from_parts(color, PieceKind::Pawn),
            None => placed,
        };

        let delta = self.hash_delta(mv, color, moved, &undo, self.r.castling, self.r.ep_target);
        self.hash ^= delta;

        self.r.put(mv.dst, Piece::NONE);
        if let MoveClass::Castling(side) = undo.special {
            let rook = Piece::from_parts(color, PieceKind::Rook);
            self.r.put(rook_castle_dst(color, side), Piece::NONE);
            self.r.put(geometry::rook_home(color, side), rook);
        }
        if undo.captured.is_some() {
            let capture_sq = match undo.special {
                MoveClass::Enpassant => enpassant_victim(mv),
                _ => mv.dst,
            };
            self.r.put(capture_sq, undo.captured);
        }
        self.r.put(mv.src, moved);

        self.r.castling = undo.castling;
        self.r.ep_target = undo.ep_target;
        self.r.halfmove_clock = undo.halfmove_clock;
        self.r.side = color;
        if color == Color::Black {
            self.r.move_number -= 1;
        }
        mv
    }

    /// Applies `mv` if it is legal in the current position. On error the
    /// board is left untouched.
    pub fn make(&mut self, mv: Move) -> Result<(), IllegalMoveError> {
        if !self.legal_moves().contains(&mv) {
            return Err(IllegalMoveError(mv));
        }
        self.make_unchecked(mv);
        Ok(())
    }

    /// Parses and applies a single move in UCI notation.
    pub fn make_uci(&mut self, s: &str) -> Result<Move, UciMoveError> {
        let mv = Move::from_str(s)?;
        self.make(mv)?;
        Ok(mv)
    }

    /// Applies a whitespace-separated list of UCI moves. Moves before
    /// the failing one stay applied.
    pub fn make_uci_list(&mut self, s: &str) -> Result<(), UciListError> {
        for (pos, token) in s.split_whitespace().enumerate() {
            self.make_uci(token)
                .map_err(|source| UciListError { pos, source })?;
        }
        Ok(())
    }
}
