//! Core types for chess.
//!
//! This crate provides the fundamental types used across the chess engine:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`] for move representation
//! - FEN parsing
//!
//! Coordinates follow the board grid used by the engine: rank 0 is black's
//! back rank (algebraic rank 8) and rank 7 is white's back rank (algebraic
//! rank 1). File 0 is the a-file.

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::Move;
pub use piece::{Piece, PieceKind};
pub use square::{Square, SquareError};
