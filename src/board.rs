//! Position state and the FEN codec.
//!
//! [`RawBoard`] is the plain position record: the 64-slot mailbox array
//! plus side to move, castling rights, en passant target and the move
//! counters. It converts to and from FEN but enforces nothing beyond
//! syntax, so it can represent positions that make no sense in a game.
//!
//! [`Board`] wraps a validated `RawBoard` together with an incrementally
//! maintained Zobrist hash and the history stack used by unmake. All
//! move application lives on `Board`; see [`crate::moves`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::geometry;
use crate::moves::{Move, Undo};
use crate::types::{
    CastlingRights, CastlingRightsParseError, Color, ColorParseError, File, Piece, PieceKind,
    Rank, Square, SquareParseError,
};
use crate::zobrist::Zobrist;

/// Errors from parsing the piece placement field of a FEN string.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellsParseError {
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    #[error("too many ranks")]
    Overflow,
    #[error("not enough ranks")]
    Underflow,
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Errors from parsing a full FEN string into a [`RawBoard`]. All six
/// FEN fields are required.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RawFenParseError {
    #[error("board not specified")]
    NoBoard,
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    #[error("no move side")]
    NoMoveSide,
    #[error("bad move side: {0}")]
    MoveSide(#[from] ColorParseError),
    #[error("no castling rights")]
    NoCastling,
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    #[error("no enpassant")]
    NoEnpassant,
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] SquareParseError),
    #[error("enpassant square must be on rank {0}")]
    InvalidEnpassantRank(Rank),
    #[error("no halfmove clock")]
    NoHalfmoveClock,
    #[error("bad halfmove clock")]
    HalfmoveClock,
    #[error("no move number")]
    NoMoveNumber,
    #[error("bad move number")]
    MoveNumber,
    #[error("extra data in FEN")]
    ExtraData,
}

/// Errors from validating a [`RawBoard`] as a playable position.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidateError {
    #[error("no king of color {0:?}")]
    NoKing(Color),
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("cannot parse FEN: {0}")]
    Fen(#[from] RawFenParseError),
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Plain position state with no validity or hashing guarantees.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RawBoard {
    pub cells: [Piece; 64],
    pub side: Color,
    pub castling: CastlingRights,
    pub ep_target: Option<Square>,
    pub halfmove_clock: u16,
    pub move_number: u16,
}

impl RawBoard {
    pub fn empty() -> RawBoard {
        RawBoard {
            cells: [Piece::NONE; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
            halfmove_clock: 0,
            move_number: 1,
        }
    }

    /// Standard starting position.
    pub fn initial() -> RawBoard {
        let mut res = RawBoard::empty();
        for file in File::iter() {
            res.put(
                Square::from_parts(file, Rank::R2),
                Piece::from_parts(Color::White, PieceKind::Pawn),
            );
            res.put(
                Square::from_parts(file, Rank::R7),
                Piece::from_parts(Color::Black, PieceKind::Pawn),
            );
        }
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
        for (file, kind) in File::iter().zip(back) {
            res.put(
                Square::from_parts(file, Rank::R1),
                Piece::from_parts(Color::White, kind),
            );
            res.put(
                Square::from_parts(file, Rank::R8),
                Piece::from_parts(Color::Black, kind),
            );
        }
        res.castling = CastlingRights::FULL;
        res
    }

    pub fn get(&self, sq: Square) -> Piece {
        self.cells[sq.index()]
    }

    pub fn put(&mut self, sq: Square, piece: Piece) {
        self.cells[sq.index()] = piece;
    }

    pub fn king_square(&self, c: Color) -> Option<Square> {
        let king = Piece::from_parts(c, PieceKind::King);
        Square::iter().find(|&sq| self.get(sq) == king)
    }

    /// Recomputes the Zobrist hash of this position from scratch. The
    /// incremental hash kept by [`Board`] must always agree with this.
    pub fn zobrist_hash(&self, keys: &Zobrist) -> u64 {
        let mut hash = 0;
        for sq in Square::iter() {
            let piece = self.get(sq);
            if piece.is_some() {
                hash ^= keys.piece(piece, sq);
            }
        }
        if self.side == Color::Black {
            hash ^= keys.side();
        }
        hash ^= keys.castling_delta(CastlingRights::EMPTY, self.castling);
        if let Some(ep) = self.ep_target {
            hash ^= keys.enpassant(ep.file());
        }
        hash
    }

    fn parse_cells(s: &str) -> Result<[Piece; 64], CellsParseError> {
        type Error = CellsParseError;
        let mut cells = [Piece::NONE; 64];
        let mut file = 0_usize;
        let mut rank = 0_usize;
        for c in s.chars() {
            match c {
                '1'..='8' => {
                    file += (u32::from(c) - u32::from('0')) as usize;
                    if file > 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                }
                '/' => {
                    if file < 8 {
                        return Err(Error::RankUnderflow(Rank::from_index(rank)));
                    }
                    if rank == 7 {
                        return Err(Error::Overflow);
                    }
                    file = 0;
                    rank += 1;
                }
                _ => {
                    if file == 8 {
                        return Err(Error::RankOverflow(Rank::from_index(rank)));
                    }
                    let piece = Piece::from_char(c)
                        .filter(|p| p.is_some())
                        .ok_or(Error::UnexpectedChar(c))?;
                    cells[(rank << 3) | file] = piece;
                    file += 1;
                }
            }
        }
        if file < 8 {
            return Err(Error::RankUnderflow(Rank::from_index(rank)));
        }
        if rank < 7 {
            return Err(Error::Underflow);
        }
        Ok(cells)
    }

    fn write_cells(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank != Rank::R8 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = self.get(Square::from_parts(file, rank));
                if piece.is_none() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidateError> {
        for color in [Color::White, Color::Black] {
            let king = Piece::from_parts(color, PieceKind::King);
            match Square::iter().filter(|&sq| self.get(sq) == king).count() {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }
        for sq in Square::iter() {
            if self.get(sq).kind() == Some(PieceKind::Pawn)
                && matches!(sq.rank(), Rank::R1 | Rank::R8)
            {
                return Err(ValidateError::InvalidPawn(sq));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.write_cells(f)?;
        write!(f, " {} {} ", self.side, self.castling)?;
        match self.ep_target {
            Some(sq) => write!(f, "{}", sq)?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.move_number)
    }
}

impl FromStr for RawBoard {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        type Error = RawFenParseError;
        let mut iter = s.split(' ').filter(|s| !s.is_empty());

        let cells = Self::parse_cells(iter.next().ok_or(Error::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        let castling = CastlingRights::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        let ep_str = iter.next().ok_or(Error::NoEnpassant)?;
        let ep_target = match ep_str {
            "-" => None,
            _ => {
                let sq = Square::from_str(ep_str)?;
                if sq.rank() != geometry::ep_target_rank(side) {
                    return Err(Error::InvalidEnpassantRank(geometry::ep_target_rank(side)));
                }
                Some(sq)
            }
        };
        let halfmove_clock = iter
            .next()
            .ok_or(Error::NoHalfmoveClock)?
            .parse::<u16>()
            .map_err(|_| Error::HalfmoveClock)?;
        let move_number = iter
            .next()
            .ok_or(Error::NoMoveNumber)?
            .parse::<u16>()
            .map_err(|_| Error::MoveNumber)?;

        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        Ok(RawBoard {
            cells,
            side,
            castling,
            ep_target,
            halfmove_clock,
            move_number,
        })
    }
}

/// Validated position with an incrementally maintained Zobrist hash and
/// the move history needed for unmake.
///
/// A `Board` is a single-writer structure: it is `Send` but mutation is
/// not synchronized. Share the key table, not the board.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) r: RawBoard,
    pub(crate) hash: u64,
    pub(crate) keys: Arc<Zobrist>,
    pub(crate) history: Vec<(Move, Undo)>,
}

impl Board {
    pub fn new(raw: RawBoard, keys: Arc<Zobrist>) -> Result<Board, ValidateError> {
        raw.validate()?;
        let board = Board {
            hash: raw.zobrist_hash(&keys),
            r: raw,
            keys,
            history: Vec::new(),
        };
        // A position where the side to move could capture the king is
        // unreachable and breaks the legality filter's assumptions.
        let opponent_king = board
            .r
            .king_square(board.r.side.inv())
            .ok_or(ValidateError::NoKing(board.r.side.inv()))?;
        if board.is_attacked(opponent_king, board.r.side) {
            return Err(ValidateError::OpponentKingAttacked);
        }
        Ok(board)
    }

    pub fn initial(keys: Arc<Zobrist>) -> Board {
        Self::new(RawBoard::initial(), keys).expect("initial position is valid")
    }

    pub fn from_fen(fen: &str, keys: Arc<Zobrist>) -> Result<Board, FenParseError> {
        Ok(Self::new(RawBoard::from_str(fen)?, keys)?)
    }

    pub fn raw(&self) -> &RawBoard {
        &self.r
    }

    pub fn get(&self, sq: Square) -> Piece {
        self.r.get(sq)
    }

    pub fn side(&self) -> Color {
        self.r.side
    }

    pub fn castling(&self) -> CastlingRights {
        self.r.castling
    }

    pub fn ep_target(&self) -> Option<Square> {
        self.r.ep_target
    }

    /// Square of the given side's king. Validation guarantees exactly
    /// one exists.
    pub fn king_square(&self, c: Color) -> Square {
        self.r
            .king_square(c)
            .expect("valid board must have both kings")
    }

    /// Current incremental hash. Always equal to
    /// `self.raw().zobrist_hash(self.keys())`.
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    pub fn keys(&self) -> &Arc<Zobrist> {
        &self.keys
    }

    /// Number of moves applied and not yet reverted.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn as_fen(&self) -> String {
        self.r.to_string()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.r == other.r && self.hash == other.hash
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn keys() -> Arc<Zobrist> {
        Arc::new(Zobrist::new())
    }

    #[test]
    fn test_initial() {
        let raw = RawBoard::initial();
        assert_eq!(raw.to_string(), INITIAL_FEN);
        assert_eq!(RawBoard::from_str(INITIAL_FEN), Ok(raw));

        let board = Board::initial(keys());
        assert_eq!(board.as_fen(), INITIAL_FEN);
        assert_eq!(board.side(), Color::White);
        assert_eq!(
            board.king_square(Color::White),
            Square::from_str("e1").unwrap()
        );
        assert_eq!(
            board.get(Square::from_str("c8").unwrap()),
            Piece::from_parts(Color::Black, PieceKind::Bishop)
        );
    }

    #[test]
    fn test_fen_roundtrip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "5K2/8/8/8/8/8/8/5k2 w - - 97 151",
        ] {
            let raw = RawBoard::from_str(fen).unwrap();
            assert_eq!(raw.to_string(), fen);
            let board = Board::new(raw, keys()).unwrap();
            assert_eq!(board.as_fen(), fen);
            assert_eq!(board.zobrist_hash(), raw.zobrist_hash(board.keys()));
        }
    }

    #[test]
    fn test_fen_errors() {
        type E = RawFenParseError;
        for (fen, err) in [
            ("", E::NoBoard),
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", E::NoMoveSide),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
                E::NoHalfmoveClock,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0",
                E::NoMoveNumber,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
                E::ExtraData,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
                E::InvalidEnpassantRank(Rank::R6),
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
                E::HalfmoveClock,
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                E::Board(CellsParseError::Underflow),
            ),
            (
                "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                E::Board(CellsParseError::RankOverflow(Rank::R7)),
            ),
            (
                "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                E::Board(CellsParseError::RankUnderflow(Rank::R7)),
            ),
            (
                "rnbqxbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                E::Board(CellsParseError::UnexpectedChar('x')),
            ),
        ] {
            assert_eq!(RawBoard::from_str(fen), Err(err), "fen: {:?}", fen);
        }
    }

    #[test]
    fn test_validation() {
        type E = ValidateError;
        for (fen, err) in [
            (
                "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                E::NoKing(Color::Black),
            ),
            (
                "rnbqkknr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                E::TooManyKings(Color::Black),
            ),
            (
                "P3k3/8/8/8/8/8/8/4K3 w - - 0 1",
                E::InvalidPawn(Square::from_str("a8").unwrap()),
            ),
            ("4k3/4Q3/8/8/8/8/8/4K3 w - - 0 1", E::OpponentKingAttacked),
        ] {
            let raw = RawBoard::from_str(fen).unwrap();
            assert_eq!(Board::new(raw, keys()).unwrap_err(), err, "fen: {:?}", fen);
        }
    }

    #[test]
    fn test_hash_differs_by_metadata() {
        let keys = keys();
        let with_ep = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let without_ep = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let a = Board::from_fen(with_ep, keys.clone()).unwrap();
        let b = Board::from_fen(without_ep, keys.clone()).unwrap();
        assert_ne!(a.zobrist_hash(), b.zobrist_hash());

        let no_castle = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1";
        let c = Board::from_fen(no_castle, keys).unwrap();
        assert_ne!(b.zobrist_hash(), c.zobrist_hash());
    }
}
