//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_moves;
use crate::{Board, GameError};

/// Counts the number of leaf nodes at the given depth.
///
/// Moves are made and taken back on `board`, which is left as it was found.
/// A generated move that `apply` rejects, or a failed take-back, is a
/// generator bug and is returned as an error instead of skewing the count.
pub fn perft(board: &mut Board, depth: u32) -> Result<u64, GameError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = generate_moves(board);

    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for &m in &moves {
        board.apply(m)?;
        nodes += perft(board, depth - 1)?;
        board.undo_last()?;
    }
    Ok(nodes)
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &mut Board, depth: u32) -> Result<Vec<(String, u64)>, GameError> {
    let moves = generate_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        board.apply(m)?;
        let nodes = if depth > 1 {
            perft(board, depth - 1)?
        } else {
            1
        };
        board.undo_last()?;
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}
