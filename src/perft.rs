//! Perft: exhaustive legal move-path counting used to verify the move
//! generator and the make/unmake engine against known node counts.

use std::collections::HashMap;

use crate::board::Board;
use crate::moves::Move;

impl Board {
    /// Number of legal move sequences of length `depth` from this
    /// position. The board is restored before returning.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        if depth == 1 {
            return self.legal_moves().len() as u64;
        }
        let mut total = 0;
        for mv in self.legal_moves() {
            self.make_unchecked(mv);
            total += self.perft(depth - 1);
            let _ = self.unmake();
        }
        total
    }

    /// Like [`Board::perft`], caching subtree counts by
    /// `(zobrist hash, depth)`. Transpositions make this considerably
    /// faster at higher depths. The cache lives only for this call.
    pub fn perft_memoized(&mut self, depth: usize) -> u64 {
        let mut memo = HashMap::new();
        self.perft_memo_rec(depth, &mut memo)
    }

    fn perft_memo_rec(&mut self, depth: usize, memo: &mut HashMap<(u64, usize), u64>) -> u64 {
        if depth == 0 {
            return 1;
        }
        if depth == 1 {
            return self.legal_moves().len() as u64;
        }
        let key = (self.zobrist_hash(), depth);
        if let Some(&cached) = memo.get(&key) {
            return cached;
        }
        let mut total = 0;
        for mv in self.legal_moves() {
            self.make_unchecked(mv);
            total += self.perft_memo_rec(depth - 1, memo);
            let _ = self.unmake();
        }
        memo.insert(key, total);
        total
    }

    /// Per-root-move breakdown of `perft(depth)`, the format engines
    /// diff against each other when hunting generator bugs.
    pub fn perft_divided(&mut self, depth: usize) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let mut res = Vec::new();
        for mv in self.legal_moves() {
            self.make_unchecked(mv);
            res.push((mv, self.perft(depth - 1)));
            let _ = self.unmake();
        }
        res
    }
}
