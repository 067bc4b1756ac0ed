//! Attack sets and check detection.
//!
//! These are the non-recursive tier of move generation: pawns contribute
//! only their diagonal captures and kings only their adjacent squares, so
//! check detection never needs the legality filter.

use crate::{Bitboard, Grid};
use chess_core::{Color, Piece, PieceKind, Square};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Squares a pawn of the given color attacks from `sq` (diagonals only).
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for file_delta in [-1, 1] {
        if let Some(to) = sq.offset(color.pawn_direction(), file_delta) {
            attacks.set(to);
        }
    }
    attacks
}

fn leaper_attacks(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(dr, df) in offsets {
        if let Some(to) = sq.offset(dr, df) {
            attacks.set(to);
        }
    }
    attacks
}

/// Squares a knight attacks from `sq`.
pub fn knight_attacks(sq: Square) -> Bitboard {
    leaper_attacks(sq, &KNIGHT_OFFSETS)
}

/// Squares a king attacks from `sq`, without castling.
pub fn king_attacks(sq: Square) -> Bitboard {
    leaper_attacks(sq, &KING_OFFSETS)
}

/// Walks each direction until the board edge or the first occupied cell,
/// which is included whatever its color.
pub fn slider_attacks(grid: &Grid, sq: Square, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(dr, df) in directions {
        let mut current = sq;
        while let Some(to) = current.offset(dr, df) {
            attacks.set(to);
            if !grid.is_empty(to) {
                break;
            }
            current = to;
        }
    }
    attacks
}

/// Squares attacked along ranks and files from `sq`.
pub fn rook_attacks(grid: &Grid, sq: Square) -> Bitboard {
    slider_attacks(grid, sq, &ROOK_DIRECTIONS)
}

/// Squares attacked along diagonals from `sq`.
pub fn bishop_attacks(grid: &Grid, sq: Square) -> Bitboard {
    slider_attacks(grid, sq, &BISHOP_DIRECTIONS)
}

/// Squares attacked by a queen (rook ∪ bishop) from `sq`.
pub fn queen_attacks(grid: &Grid, sq: Square) -> Bitboard {
    rook_attacks(grid, sq) | bishop_attacks(grid, sq)
}

/// The attack set of `piece` standing on `sq`.
///
/// Own pieces at the end of a ray are included; callers that need
/// destinations rather than attacks mask them out.
pub fn attacks(grid: &Grid, sq: Square, piece: Piece) -> Bitboard {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(sq, piece.color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(grid, sq),
        PieceKind::Rook => rook_attacks(grid, sq),
        PieceKind::Queen => queen_attacks(grid, sq),
        PieceKind::King => king_attacks(sq),
    }
}

/// Returns true if any piece of `by_color` attacks `sq`.
pub fn is_square_attacked(grid: &Grid, sq: Square, by_color: Color) -> bool {
    grid.pieces(by_color)
        .any(|(from, piece)| attacks(grid, from, piece).contains(sq))
}

/// Returns true if the king of the given color is in check.
///
/// A side without a king is never in check.
pub fn is_in_check(grid: &Grid, color: Color) -> bool {
    match grid.find_king(color) {
        Some(king_sq) => is_square_attacked(grid, king_sq, color.opposite()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::FenParser;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn grid(fen: &str) -> Grid {
        Grid::from_cells(FenParser::parse(fen).unwrap().cells)
    }

    #[test]
    fn knight_attacks_corner() {
        let attacks = knight_attacks(sq("a1"));
        assert_eq!(attacks.count(), 2);
        assert!(attacks.contains(sq("b3")));
        assert!(attacks.contains(sq("c2")));
    }

    #[test]
    fn knight_attacks_center() {
        assert_eq!(knight_attacks(sq("e4")).count(), 8);
    }

    #[test]
    fn king_attacks_edge() {
        assert_eq!(king_attacks(sq("e1")).count(), 5);
        assert_eq!(king_attacks(sq("h8")).count(), 3);
    }

    #[test]
    fn pawn_attacks_direction() {
        let white = pawn_attacks(sq("e4"), Color::White);
        assert!(white.contains(sq("d5")));
        assert!(white.contains(sq("f5")));
        assert_eq!(white.count(), 2);

        let black = pawn_attacks(sq("a5"), Color::Black);
        assert!(black.contains(sq("b4")));
        assert_eq!(black.count(), 1);
    }

    #[test]
    fn pawn_does_not_attack_forward() {
        let g = grid("4k3/8/8/8/8/8/4p3/4K3 w - - 0 1");
        assert!(!is_in_check(&g, Color::White));
        let g = grid("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        assert!(is_in_check(&g, Color::White));
    }

    #[test]
    fn rook_attacks_stop_at_blockers() {
        let g = grid("8/8/8/8/1p1R2P1/8/8/8 w - - 0 1");
        let attacks = rook_attacks(&g, sq("d4"));
        assert!(attacks.contains(sq("c4")));
        assert!(attacks.contains(sq("b4")));
        assert!(!attacks.contains(sq("a4")));
        assert!(attacks.contains(sq("g4")));
        assert!(!attacks.contains(sq("h4")));
        assert!(attacks.contains(sq("d8")));
        assert!(attacks.contains(sq("d1")));
        assert_eq!(attacks.count(), 5 + 7);
    }

    #[test]
    fn queen_is_rook_and_bishop() {
        let g = Grid::empty();
        assert_eq!(queen_attacks(&g, sq("d4")).count(), 27);
    }

    #[test]
    fn square_attacked() {
        let g = Grid::standard();
        assert!(is_square_attacked(&g, sq("f3"), Color::White));
        assert!(!is_square_attacked(&g, sq("e4"), Color::White));
        assert!(is_square_attacked(&g, sq("f6"), Color::Black));
    }

    #[test]
    fn check_detection() {
        assert!(!is_in_check(&Grid::standard(), Color::White));

        let g = grid("4k3/8/8/8/8/8/8/4K2r w - - 0 1");
        assert!(is_in_check(&g, Color::White));
        assert!(!is_in_check(&g, Color::Black));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let g = grid("8/8/8/8/8/8/8/7r w - - 0 1");
        assert!(!is_in_check(&g, Color::White));
    }
}
