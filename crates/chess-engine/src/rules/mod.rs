//! Game status derived from a position.
//!
//! Status is never stored independently: it is recomputed from the board
//! and the side to move after every move and every undo.

use crate::movegen::{has_legal_moves, is_in_check};
use crate::Board;
use chess_core::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of play for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "winner")]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    Active,
    /// The side to move is in check with no legal moves.
    Checkmate(Color),
    /// The side to move is not in check but has no legal moves.
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Active)
    }

    /// The winning color, if the game ended in checkmate.
    #[inline]
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate(color) => Some(color),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Active => write!(f, "Game in progress"),
            GameStatus::Checkmate(winner) => write!(f, "{} wins by checkmate", winner),
            GameStatus::Stalemate => write!(f, "Game drawn by stalemate"),
        }
    }
}

/// Computes the status of the position for the side to move.
pub fn game_status(board: &Board) -> GameStatus {
    let us = board.side_to_move();
    if has_legal_moves(board, us) {
        GameStatus::Active
    } else if is_in_check(board.grid(), us) {
        GameStatus::Checkmate(us.opposite())
    } else {
        GameStatus::Stalemate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Move;

    #[test]
    fn startpos_is_active() {
        assert_eq!(game_status(&Board::initial()), GameStatus::Active);
    }

    #[test]
    fn fools_mate() {
        let mut board = Board::initial();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            board.apply(Move::from_uci(uci).unwrap()).unwrap();
        }
        let status = game_status(&board);
        assert_eq!(status, GameStatus::Checkmate(Color::Black));
        assert_eq!(status.winner(), Some(Color::Black));
        assert!(status.is_over());
    }

    #[test]
    fn stalemate() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let status = game_status(&board);
        assert_eq!(status, GameStatus::Stalemate);
        assert_eq!(status.winner(), None);
    }

    #[test]
    fn display() {
        assert_eq!(
            GameStatus::Checkmate(Color::White).to_string(),
            "White wins by checkmate"
        );
        assert_eq!(GameStatus::Stalemate.to_string(), "Game drawn by stalemate");
    }

    #[test]
    fn serializes_with_winner() {
        let json = serde_json::to_string(&GameStatus::Checkmate(Color::White)).unwrap();
        assert_eq!(json, r#"{"status":"checkmate","winner":"white"}"#);
        let json = serde_json::to_string(&GameStatus::Active).unwrap();
        assert_eq!(json, r#"{"status":"active"}"#);
    }
}
