//! Chess rules engine on an 8×8 grid of optional pieces.
//!
//! This crate provides:
//! - [`Board`] - grid, side to move and append-only move history
//! - [`Game`] - status tracking and the interface a front end drives
//! - [`MoveSelector`] - greedy single-ply move choice for a bot opponent
//! - Move generation, check detection and perft validation in [`movegen`]
//! - Move notation and material evaluation
//!
//! # Architecture
//!
//! Move generation has two tiers. Pseudo-legal moves and attack sets
//! follow piece movement rules only; the legal tier tries each move on a
//! scratch copy of the grid and drops those that leave the mover in check.
//! Check detection uses only the attack sets, so the tiers never recurse
//! into each other.
//!
//! Castling rights and the en passant target are derived from the move
//! history rather than stored, so undo restores them for free.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, GameStatus};
//! use std::time::Duration;
//!
//! let mut game = Game::new().with_seed(1);
//! // e2 is rank 6, file 4.
//! println!("e2 pawn can go to {} squares", game.legal_moves(6, 4).unwrap().len());
//!
//! game.apply_uci("e2e4").unwrap();
//! if let Some(reply) = game.select_move(Duration::from_millis(100)) {
//!     assert_eq!(game.play(reply).unwrap(), GameStatus::Active);
//! }
//! println!("{}", game.move_list());
//! ```

mod bitboard;
mod board;
mod castling;
pub mod evaluation;
mod game;
mod grid;
pub mod movegen;
pub mod notation;
pub mod rules;
pub mod selector;

pub use bitboard::Bitboard;
pub use board::{Board, MoveFlag, MoveRecord};
pub use castling::{king_origin, CastleSide, CastlingRights};
pub use game::{Game, GameError};
pub use grid::Grid;
pub use movegen::{
    generate_moves, has_legal_moves, is_in_check, is_square_attacked, legal_moves_from,
    pseudo_legal_moves, would_be_in_check, MoveList,
};
pub use rules::{game_status, GameStatus};
pub use selector::MoveSelector;
