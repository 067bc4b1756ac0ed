//! The 8x8 cell grid.

use chess_core::{Color, Piece, PieceKind, Square};
use std::fmt;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// An 8x8 grid of optional pieces, indexed `[rank][file]`.
///
/// Each cell holds at most one piece. The grid knows nothing about whose
/// turn it is or how the pieces got there.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Option<Piece>; 8]; 8],
}

impl Grid {
    /// Creates an empty grid.
    pub const fn empty() -> Self {
        Grid {
            cells: [[None; 8]; 8],
        }
    }

    /// Creates a grid from raw cells.
    pub const fn from_cells(cells: [[Option<Piece>; 8]; 8]) -> Self {
        Grid { cells }
    }

    /// Creates the standard starting arrangement.
    pub fn standard() -> Self {
        let mut grid = Grid::empty();
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            grid.cells[Color::Black.back_rank() as usize][file] =
                Some(Piece::new(kind, Color::Black));
            grid.cells[Color::Black.pawn_rank() as usize][file] =
                Some(Piece::new(PieceKind::Pawn, Color::Black));
            grid.cells[Color::White.pawn_rank() as usize][file] =
                Some(Piece::new(PieceKind::Pawn, Color::White));
            grid.cells[Color::White.back_rank() as usize][file] =
                Some(Piece::new(kind, Color::White));
        }
        grid
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.rank() as usize][sq.file() as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.rank() as usize][sq.file() as usize] = piece;
    }

    /// Removes and returns the piece on a square.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.rank() as usize][sq.file() as usize].take()
    }

    pub fn cells(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.cells
    }

    /// Iterates over every occupied square with its piece.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.color == color)
    }

    /// Locates the king of the given color, scanning from rank 0.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grid({})",
            chess_core::FenParser::placement_string(&self.cells)
        )
    }
}

/// Text diagram with algebraic labels, rank 8 at the top.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", 8 - rank)?;
            for cell in row {
                let c = cell.map(|p| p.to_fen_char()).unwrap_or('.');
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn standard_layout() {
        let grid = Grid::standard();
        assert_eq!(
            grid.get(sq("e1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            grid.get(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(
            grid.get(sq("a2")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert!(grid.is_empty(sq("e4")));
        assert_eq!(grid.occupied().count(), 32);
        assert_eq!(grid.pieces(Color::Black).count(), 16);
    }

    #[test]
    fn find_king() {
        let grid = Grid::standard();
        assert_eq!(grid.find_king(Color::White), Some(sq("e1")));
        assert_eq!(grid.find_king(Color::Black), Some(sq("e8")));
        assert_eq!(Grid::empty().find_king(Color::White), None);
    }

    #[test]
    fn set_and_take() {
        let mut grid = Grid::empty();
        let knight = Piece::new(PieceKind::Knight, Color::White);
        grid.set(sq("c3"), Some(knight));
        assert_eq!(grid.get(sq("c3")), Some(knight));
        assert_eq!(grid.take(sq("c3")), Some(knight));
        assert!(grid.is_empty(sq("c3")));
    }

    #[test]
    fn display_diagram() {
        let text = Grid::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
