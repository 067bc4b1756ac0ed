//! Static material evaluation.

use crate::Grid;
use chess_core::Color;

/// Signed material balance in centipawns, white minus black.
///
/// Kings are counted like any other piece, so they cancel out whenever
/// both are on the board.
pub fn material_balance(grid: &Grid) -> i32 {
    grid.occupied()
        .map(|(_, piece)| match piece.color {
            Color::White => piece.kind.value(),
            Color::Black => -piece.kind.value(),
        })
        .sum()
}

/// Material balance scaled to roughly pawn-sized units (balance / 1000).
pub fn normalized_eval(grid: &Grid) -> f64 {
    f64::from(material_balance(grid)) / 1000.0
}

/// White's share of an evaluation bar, from 0 to 100.
///
/// Level material is 50; each whole unit of [`normalized_eval`] moves the
/// bar ten points.
pub fn white_percentage(grid: &Grid) -> f64 {
    (50.0 + normalized_eval(grid) * 10.0).clamp(0.0, 100.0)
}
