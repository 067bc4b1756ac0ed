//! Board square representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced when building a square from raw coordinates.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SquareError {
    #[error("coordinate out of bounds: rank {rank}, file {file}")]
    OutOfBounds { rank: i32, file: i32 },
}

/// A square on the 8x8 grid.
///
/// Rank 0 is black's back rank (algebraic rank 8) and rank 7 is white's
/// back rank (algebraic rank 1). File 0 is the a-file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    /// Creates a square, failing if either coordinate lies outside `0..8`.
    pub fn new(rank: i32, file: i32) -> Result<Self, SquareError> {
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Ok(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            Err(SquareError::OutOfBounds { rank, file })
        }
    }

    /// Creates a square from coordinates known to be on the board.
    ///
    /// Both coordinates must be in `0..8`; this is only checked in debug builds.
    #[inline]
    pub const fn at(rank: u8, file: u8) -> Self {
        debug_assert!(rank < 8 && file < 8);
        Square { rank, file }
    }

    /// Iterates over all 64 squares, rank 0 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { rank, file }))
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Square::at(b'8' - rank, file - b'a'))
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns the square shifted by the given deltas, if still on the board.
    #[inline]
    pub fn offset(self, rank_delta: i8, file_delta: i8) -> Option<Square> {
        let rank = self.rank as i8 + rank_delta;
        let file = self.file as i8 + file_delta;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::at(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Returns the algebraic rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.rank) as char
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
