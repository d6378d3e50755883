//! Move generation and the attack oracle.
//!
//! Generation is mailbox-style: each piece walks its index offsets and a
//! Manhattan distance check rejects steps that wrapped around a board
//! edge (a genuine king or slider step moves at most 2, a knight jump
//! exactly 3, a pawn capture exactly 2).
//!
//! Pseudo-legal moves obey piece movement and occupancy only. The
//! legality filter applies each candidate to a scratch copy of the
//! board, asks the attack oracle whether the own king is safe, and
//! reverts it.

use std::ops::Deref;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::geometry::{self, ALL_DIRECTIONS, DIAGONAL, KNIGHT_JUMPS, ORTHOGONAL};
use crate::moves::Move;
use crate::types::{CastlingSide, Color, File, Piece, PieceKind, Square};

/// Fixed-capacity move container. 256 slots is enough for any legal
/// chess position.
#[derive(Debug, Default, Clone)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }
}

impl Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &[Move] {
        &self.0
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = <ArrayVec<Move, 256> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

const PROMOTE_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

fn push_pawn_move(res: &mut MoveList, color: Color, src: Square, dst: Square) {
    if dst.rank() == geometry::promote_rank(color) {
        for kind in PROMOTE_KINDS {
            res.push(Move::with_promote(src, dst, kind));
        }
    } else {
        res.push(Move::new(src, dst));
    }
}

impl Board {
    fn gen_pawn(&self, color: Color, src: Square, res: &mut MoveList) {
        let fwd = geometry::pawn_forward_delta(color);
        if let Some(one) = src.shifted(fwd) {
            if self.get(one).is_none() {
                push_pawn_move(res, color, src, one);
                if src.rank() == geometry::pawn_start_rank(color) {
                    if let Some(two) = one.shifted(fwd) {
                        if self.get(two).is_none() {
                            res.push(Move::new(src, two));
                        }
                    }
                }
            }
        }
        for delta in [fwd - 1, fwd + 1] {
            let dst = match src.shifted(delta) {
                Some(dst) if src.manhattan(dst) == 2 => dst,
                _ => continue,
            };
            if self.get(dst).color() == Some(color.inv()) {
                push_pawn_move(res, color, src, dst);
            } else if self.ep_target() == Some(dst) {
                res.push(Move::new(src, dst));
            }
        }
    }

    fn gen_step(
        &self,
        color: Color,
        src: Square,
        deltas: &[isize],
        max_dist: usize,
        res: &mut MoveList,
    ) {
        for &delta in deltas {
            if let Some(dst) = src.shifted(delta) {
                if src.manhattan(dst) <= max_dist && self.get(dst).color() != Some(color) {
                    res.push(Move::new(src, dst));
                }
            }
        }
    }

    fn gen_slider(&self, color: Color, src: Square, deltas: &[isize], res: &mut MoveList) {
        for &delta in deltas {
            let mut cur = src;
            loop {
                let next = match cur.shifted(delta) {
                    Some(next) if cur.manhattan(next) <= 2 => next,
                    _ => break,
                };
                match self.get(next).color() {
                    None => res.push(Move::new(src, next)),
                    Some(c) => {
                        if c != color {
                            res.push(Move::new(src, next));
                        }
                        break;
                    }
                }
                cur = next;
            }
        }
    }

    fn gen_castlings(&self, color: Color, res: &mut MoveList) {
        let king = geometry::king_home(color);
        if self.get(king) != Piece::from_parts(color, PieceKind::King) {
            return;
        }
        let rook = Piece::from_parts(color, PieceKind::Rook);
        let rank = geometry::castling_rank(color);
        let empty_between = |files: &[File]| {
            files
                .iter()
                .all(|&f| self.get(Square::from_parts(f, rank)).is_none())
        };
        if self.castling().has(color, CastlingSide::King)
            && self.get(geometry::rook_home(color, CastlingSide::King)) == rook
            && empty_between(&[File::F, File::G])
        {
            res.push(Move::new(king, Square::from_parts(File::G, rank)));
        }
        if self.castling().has(color, CastlingSide::Queen)
            && self.get(geometry::rook_home(color, CastlingSide::Queen)) == rook
            && empty_between(&[File::D, File::C, File::B])
        {
            res.push(Move::new(king, Square::from_parts(File::C, rank)));
        }
    }

    /// Appends all pseudo-legal moves of the piece on `src`. Does
    /// nothing if `src` is empty or holds an opposing piece.
    pub fn pseudo_legal_from(&self, src: Square, res: &mut MoveList) {
        let color = self.side();
        let piece = self.get(src);
        if piece.color() != Some(color) {
            return;
        }
        match piece.kind() {
            Some(PieceKind::Pawn) => self.gen_pawn(color, src, res),
            Some(PieceKind::Knight) => self.gen_step(color, src, &KNIGHT_JUMPS, 3, res),
            Some(PieceKind::Bishop) => self.gen_slider(color, src, &DIAGONAL, res),
            Some(PieceKind::Rook) => self.gen_slider(color, src, &ORTHOGONAL, res),
            Some(PieceKind::Queen) => self.gen_slider(color, src, &ALL_DIRECTIONS, res),
            Some(PieceKind::King) => {
                self.gen_step(color, src, &ALL_DIRECTIONS, 2, res);
                if src == geometry::king_home(color) {
                    self.gen_castlings(color, res);
                }
            }
            None => {}
        }
    }

    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut res = MoveList::new();
        for src in Square::iter() {
            self.pseudo_legal_from(src, &mut res);
        }
        res
    }

    /// True if any piece of color `by` attacks `sq`. The en passant rule
    /// is irrelevant here: it never attacks an occupied square.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.scan_attackers(sq, by, None)
    }

    /// Squares of all pieces of color `by` attacking `sq`.
    pub fn attackers(&self, sq: Square, by: Color) -> Vec<Square> {
        let mut found = Vec::new();
        self.scan_attackers(sq, by, Some(&mut found));
        found
    }

    // With `found == None` short-circuits on the first attacker and the
    // return value says whether one exists; otherwise collects them all
    // and the return value is unspecified.
    fn scan_attackers(&self, sq: Square, by: Color, mut found: Option<&mut Vec<Square>>) -> bool {
        let hit = |origin: Square, found: &mut Option<&mut Vec<Square>>| -> bool {
            match found {
                Some(list) => {
                    list.push(origin);
                    false
                }
                None => true,
            }
        };

        // Pawn attack origins are one backward diagonal step away.
        let fwd = geometry::pawn_forward_delta(by);
        let pawn = Piece::from_parts(by, PieceKind::Pawn);
        for delta in [-fwd - 1, -fwd + 1] {
            if let Some(origin) = sq.shifted(delta) {
                if sq.manhattan(origin) == 2 && self.get(origin) == pawn {
                    if hit(origin, &mut found) {
                        return true;
                    }
                }
            }
        }

        let knight = Piece::from_parts(by, PieceKind::Knight);
        for delta in KNIGHT_JUMPS {
            if let Some(origin) = sq.shifted(delta) {
                if sq.manhattan(origin) == 3 && self.get(origin) == knight {
                    if hit(origin, &mut found) {
                        return true;
                    }
                }
            }
        }

        let king = Piece::from_parts(by, PieceKind::King);
        for delta in ALL_DIRECTIONS {
            if let Some(origin) = sq.shifted(delta) {
                if sq.manhattan(origin) <= 2 && self.get(origin) == king {
                    if hit(origin, &mut found) {
                        return true;
                    }
                }
            }
        }

        for (deltas, line_kind) in [(ORTHOGONAL, PieceKind::Rook), (DIAGONAL, PieceKind::Bishop)] {
            let line = Piece::from_parts(by, line_kind);
            let queen = Piece::from_parts(by, PieceKind::Queen);
            for delta in deltas {
                let mut cur = sq;
                loop {
                    let next = match cur.shifted(delta) {
                        Some(next) if cur.manhattan(next) <= 2 => next,
                        _ => break,
                    };
                    let piece = self.get(next);
                    if piece.is_some() {
                        if (piece == line || piece == queen) && hit(next, &mut found) {
                            return true;
                        }
                        break;
                    }
                    cur = next;
                }
            }
        }

        false
    }

    // Applies `mv` to self, checks king safety, reverts. For king moves
    // the destination is probed directly; castling additionally requires
    // the origin and the passed-over square to be safe.
    fn probe_legal(&mut self, mv: Move) -> bool {
        let color = self.side();
        let king_move = self.get(mv.src).is(color, PieceKind::King);
        self.make_unchecked(mv);
        let enemy = color.inv();
        let safe = if king_move {
            let mut safe = !self.is_attacked(mv.dst, enemy);
            if mv.src.rank() == mv.dst.rank()
                && mv.src.file().index().abs_diff(mv.dst.file().index()) == 2
            {
                let passed = Square::from_index((mv.src.index() + mv.dst.index()) / 2);
                safe = safe
                    && !self.is_attacked(mv.src, enemy)
                    && !self.is_attacked(passed, enemy);
            }
            safe
        } else {
            !self.is_attacked(self.king_square(color), enemy)
        };
        let _ = self.unmake();
        safe
    }

    pub fn legal_moves(&self) -> MoveList {
        let mut res = MoveList::new();
        let mut probe = self.clone();
        for mv in self.pseudo_legal_moves() {
            if probe.probe_legal(mv) {
                res.push(mv);
            }
        }
        res
    }

    /// Legal moves of the piece on `src` only.
    pub fn legal_moves_from(&self, src: Square) -> MoveList {
        let mut candidates = MoveList::new();
        self.pseudo_legal_from(src, &mut candidates);
        let mut res = MoveList::new();
        let mut probe = self.clone();
        for mv in candidates {
            if probe.probe_legal(mv) {
                res.push(mv);
            }
        }
        res
    }

    pub fn has_legal_moves(&self) -> bool {
        let mut probe = self.clone();
        self.pseudo_legal_moves()
            .into_iter()
            .any(|mv| probe.probe_legal(mv))
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.is_attacked(self.king_square(self.side()), self.side().inv())
    }

    /// Squares of the pieces giving check to the side to move.
    pub fn checkers(&self) -> Vec<Square> {
        self.attackers(self.king_square(self.side()), self.side().inv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zobrist::Zobrist;
    use std::collections::HashSet;
    use std::str::FromStr;
    use std::sync::Arc;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen, Arc::new(Zobrist::new())).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    fn move_strings(list: &MoveList) -> HashSet<String> {
        list.iter().map(|mv| mv.to_string()).collect()
    }

    #[test]
    fn test_startpos_counts() {
        let b = board("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(b.pseudo_legal_moves().len(), 20);
        assert_eq!(b.legal_moves().len(), 20);
        assert!(b.has_legal_moves());
        assert!(!b.is_check());
    }

    #[test]
    fn test_attackers() {
        let b = board("3R3B/8/3R4/1NP1Q3/3p4/1NP5/5B2/3R1K1k w - - 0 1");
        let found: HashSet<Square> = b.attackers(sq("d4"), Color::White).into_iter().collect();
        let expected: HashSet<Square> = ["d6", "e5", "b5", "b3", "c3", "f2", "d1"]
            .into_iter()
            .map(sq)
            .collect();
        assert_eq!(found, expected);
        assert!(b.is_attacked(sq("d4"), Color::White));
        assert!(!b.is_attacked(sq("a4"), Color::White));
        assert!(b.attackers(sq("a4"), Color::White).is_empty());
    }

    #[test]
    fn test_pinned_piece() {
        let b = board("3kr3/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(b.legal_moves_from(sq("e2")).is_empty());
        // The knight still has pseudo-legal moves.
        let mut pseudo = MoveList::new();
        b.pseudo_legal_from(sq("e2"), &mut pseudo);
        assert!(!pseudo.is_empty());
    }

    #[test]
    fn test_castling_through_check() {
        let b = board("r3k2r/8/8/8/8/5r2/8/R3K2R w KQkq - 0 1");
        let legal = move_strings(&b.legal_moves());
        assert!(!legal.contains("e1g1"));
        assert!(legal.contains("e1c1"));
    }

    #[test]
    fn test_castling_blocked() {
        let b = board("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        let legal = move_strings(&b.legal_moves());
        assert!(!legal.contains("e1c1"));
        assert!(legal.contains("e1g1"));
    }

    #[test]
    fn test_checkmate() {
        let b = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(b.is_check());
        assert_eq!(b.checkers(), vec![sq("h4")]);
        assert!(!b.has_legal_moves());
    }

    #[test]
    fn test_stalemate() {
        let b = board("7k/5Q2/5K2/8/8/8/8/8 b - - 0 1");
        assert!(!b.is_check());
        assert!(!b.has_legal_moves());
    }

    #[test]
    fn test_enpassant_generated() {
        let b = board("3K4/3p4/8/3PpP2/8/8/8/2k5 w - e6 0 1");
        let legal = move_strings(&b.legal_moves());
        assert!(legal.contains("d5e6"));
        assert!(legal.contains("f5e6"));
    }

    #[test]
    fn test_promotions_generated() {
        let b = board("8/P6k/8/8/8/8/7K/8 w - - 0 1");
        let legal = move_strings(&b.legal_moves_from(sq("a7")));
        assert_eq!(
            legal,
            ["a7a8q", "a7a8r", "a7a8b", "a7a8n"]
                .into_iter()
                .map(String::from)
                .collect::<HashSet<_>>()
        );
    }
}
