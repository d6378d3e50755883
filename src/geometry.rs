//! Board geometry: step offsets over the linear square index and the
//! special ranks and home squares used by move generation.

use crate::types::{CastlingSide, Color, File, Rank, Square};

/// Rook directions: up, down, left, right.
pub const ORTHOGONAL: [isize; 4] = [-8, 8, -1, 1];

/// Bishop directions.
pub const DIAGONAL: [isize; 4] = [-9, -7, 7, 9];

/// King and queen directions.
pub const ALL_DIRECTIONS: [isize; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

/// Knight jumps. Each has Manhattan distance 3 from the origin, which
/// distinguishes a genuine jump from an edge wraparound.
pub const KNIGHT_JUMPS: [isize; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

/// Index delta of a single pawn push. White pawns move towards rank 8,
/// which is index zero.
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -8,
        Color::Black => 8,
    }
}

/// Rank from which pawns may make a double push.
pub const fn pawn_start_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Destination rank on which a pawn must promote.
pub const fn promote_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank holding the en passant target square when the given side is to
/// move (i.e. the rank the opponent's double push skipped over).
pub const fn ep_target_rank(side_to_move: Color) -> Rank {
    match side_to_move {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Home rank of the king and rooks.
pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Corner square a rook must occupy for the corresponding castling right
/// to be usable.
pub const fn rook_home(c: Color, side: CastlingSide) -> Square {
    let file = match side {
        CastlingSide::Queen => File::A,
        CastlingSide::King => File::H,
    };
    Square::from_parts(file, castling_rank(c))
}

/// Starting square of the king.
pub const fn king_home(c: Color) -> Square {
    Square::from_parts(File::E, castling_rank(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_homes() {
        assert_eq!(king_home(Color::White), Square::from_str("e1").unwrap());
        assert_eq!(king_home(Color::Black), Square::from_str("e8").unwrap());
        assert_eq!(
            rook_home(Color::White, CastlingSide::Queen),
            Square::from_str("a1").unwrap()
        );
        assert_eq!(
            rook_home(Color::White, CastlingSide::King),
            Square::from_str("h1").unwrap()
        );
        assert_eq!(
            rook_home(Color::Black, CastlingSide::Queen),
            Square::from_str("a8").unwrap()
        );
        assert_eq!(
            rook_home(Color::Black, CastlingSide::King),
            Square::from_str("h8").unwrap()
        );
    }

    #[test]
    fn test_pawn_deltas() {
        let e2 = Square::from_str("e2").unwrap();
        let e7 = Square::from_str("e7").unwrap();
        assert_eq!(
            e2.shifted(pawn_forward_delta(Color::White)),
            Some(Square::from_str("e3").unwrap())
        );
        assert_eq!(
            e7.shifted(pawn_forward_delta(Color::Black)),
            Some(Square::from_str("e6").unwrap())
        );
        assert_eq!(e2.rank(), pawn_start_rank(Color::White));
        assert_eq!(e7.rank(), pawn_start_rank(Color::Black));
    }

    #[test]
    fn test_knight_jump_distance() {
        let d4 = Square::from_str("d4").unwrap();
        for delta in KNIGHT_JUMPS {
            let dst = d4.shifted(delta).unwrap();
            assert_eq!(d4.manhattan(dst), 3);
        }
    }
}
