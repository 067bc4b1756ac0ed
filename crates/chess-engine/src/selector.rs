//! Greedy single-ply move selection for the automated opponent.
//!
//! Every legal move for the side to move is scored with a static
//! heuristic and the best one is played. There is no lookahead.

use crate::movegen::generate_moves;
use crate::Board;
use chess_core::{Move, Square};
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::time::{Duration, Instant};
use tracing::debug;

/// Share of the caller's allowance the scan may use before it stops.
pub const BUDGET_FRACTION: f64 = 0.8;

/// Half-width of the random jitter added to every score.
pub const JITTER: f64 = 0.05;

const CENTRALIZATION_WEIGHT: f64 = 10.0;
const BACK_RANK_BONUS: f64 = 20.0;

/// Picks a move for the side to move within a wall-clock budget.
///
/// The budget is polled between candidates, so one scoring step can
/// overrun it. The first candidate is always scored.
#[derive(Debug, Clone)]
pub struct MoveSelector<R = SmallRng> {
    rng: R,
}

impl MoveSelector<SmallRng> {
    /// A selector seeded from system entropy.
    pub fn new() -> Self {
        MoveSelector::with_rng(SmallRng::seed_from_u64(rand::random()))
    }

    /// A reproducible selector.
    pub fn seeded(seed: u64) -> Self {
        MoveSelector::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for MoveSelector<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MoveSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        MoveSelector { rng }
    }

    /// Returns the best-scoring legal move, or `None` if the side to
    /// move has no legal moves.
    ///
    /// The board is only read; the caller applies the returned move.
    pub fn select(&mut self, board: &Board, allowance: Duration) -> Option<Move> {
        let start = Instant::now();
        let budget = allowance.mul_f64(BUDGET_FRACTION);
        let moves = generate_moves(board);

        let mut best: Option<(Move, f64)> = None;
        let mut scanned = 0usize;
        for &mv in &moves {
            let score = heuristic_score(board, mv) + self.rng.random_range(-JITTER..=JITTER);
            scanned += 1;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            if start.elapsed() > budget {
                break;
            }
        }

        match best {
            Some((mv, score)) => {
                debug!(
                    side = %board.side_to_move(),
                    candidates = moves.len(),
                    scanned,
                    expired = scanned < moves.len(),
                    %mv,
                    score,
                    "selected move"
                );
                Some(mv)
            }
            None => {
                debug!(side = %board.side_to_move(), "no legal moves to select from");
                None
            }
        }
    }
}

/// The deterministic part of a candidate's score.
///
/// Sum of the value of the piece on the destination, a bonus for landing
/// near the centre, and a bonus for leaving either back rank.
pub fn heuristic_score(board: &Board, mv: Move) -> f64 {
    let capture = board
        .get(mv.to)
        .map_or(0.0, |piece| f64::from(piece.kind.value()));
    let centralization = (7.0 - center_distance(mv.to)) * CENTRALIZATION_WEIGHT;
    let development = if mv.from.rank() == 0 || mv.from.rank() == 7 {
        BACK_RANK_BONUS
    } else {
        0.0
    };
    capture + centralization + development
}

/// Manhattan distance from the middle of the board (3.5, 3.5).
fn center_distance(sq: Square) -> f64 {
    (f64::from(sq.rank()) - 3.5).abs() + (f64::from(sq.file()) - 3.5).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    #[test]
    fn center_distance_range() {
        assert_eq!(center_distance(Square::at(3, 3)), 1.0);
        assert_eq!(center_distance(Square::at(4, 4)), 1.0);
        assert_eq!(center_distance(Square::at(0, 0)), 7.0);
        assert_eq!(center_distance(Square::at(7, 7)), 7.0);
    }

    #[test]
    fn heuristic_components() {
        let board = Board::initial();
        // e2e4: centre square, not from a back rank.
        assert_eq!(heuristic_score(&board, mv("e2e4")), 60.0);
        // g1f3: distance 3, leaves the back rank.
        assert_eq!(heuristic_score(&board, mv("g1f3")), 40.0 + 20.0);
        // a2a3: distance 5.
        assert_eq!(heuristic_score(&board, mv("a2a3")), 20.0);
    }

    #[test]
    fn capture_value_counts() {
        let board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(heuristic_score(&board, mv("e4d5")), 900.0 + 60.0);
    }

    #[test]
    fn prefers_the_biggest_capture() {
        let board = Board::from_fen("4k3/8/8/2r1q3/3P4/8/8/4K3 w - - 0 1").unwrap();
        let mut selector = MoveSelector::seeded(7);
        assert_eq!(
            selector.select(&board, Duration::from_secs(1)),
            Some(mv("d4e5"))
        );
    }

    #[test]
    fn none_when_no_legal_moves() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut selector = MoveSelector::seeded(1);
        assert_eq!(selector.select(&board, Duration::from_secs(1)), None);
    }

    #[test]
    fn single_legal_move_even_with_zero_budget() {
        // The boxed-in king cannot move; only the h-pawn can.
        let board = Board::from_fen("k7/2Q5/8/8/8/7p/8/4K3 b - - 0 1").unwrap();
        let moves = generate_moves(&board);
        assert_eq!(moves.len(), 1);
        let mut selector = MoveSelector::seeded(3);
        assert_eq!(selector.select(&board, Duration::ZERO), Some(moves[0]));
    }

    #[test]
    fn seeded_selectors_agree() {
        let board = Board::initial();
        let a = MoveSelector::seeded(42).select(&board, Duration::from_secs(1));
        let b = MoveSelector::seeded(42).select(&board, Duration::from_secs(1));
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn selection_does_not_touch_the_board() {
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = board.clone();
        let mut selector = MoveSelector::with_rng(SmallRng::seed_from_u64(9));
        selector.select(&board, Duration::from_millis(50));
        assert_eq!(board, before);
    }
}
