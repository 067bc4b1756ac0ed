//! Castling sides and declared castling rights.

use chess_core::{Color, Square};
use serde::{Deserialize, Serialize};

/// The two wings a king may castle toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// Returns the side a king's two-file step castles toward.
    #[inline]
    pub const fn from_file_delta(delta: i8) -> Self {
        if delta > 0 {
            CastleSide::Kingside
        } else {
            CastleSide::Queenside
        }
    }

    /// File the rook starts on.
    #[inline]
    pub const fn rook_origin_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    /// File the rook lands on, adjacent to the king's destination.
    #[inline]
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 5,
            CastleSide::Queenside => 3,
        }
    }

    /// File the king lands on.
    #[inline]
    pub const fn king_target_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 6,
            CastleSide::Queenside => 2,
        }
    }

    /// Files strictly between king and rook, which must be empty.
    pub const fn between_files(self) -> &'static [u8] {
        match self {
            CastleSide::Kingside => &[5, 6],
            CastleSide::Queenside => &[1, 2, 3],
        }
    }

    /// Files the king steps onto, which must not be attacked.
    pub const fn king_path_files(self) -> [u8; 2] {
        match self {
            CastleSide::Kingside => [5, 6],
            CastleSide::Queenside => [3, 2],
        }
    }

    /// Origin square of this side's rook for the given color.
    #[inline]
    pub const fn rook_origin(self, color: Color) -> Square {
        Square::at(color.back_rank(), self.rook_origin_file())
    }
}

/// Origin square of a color's king.
#[inline]
pub const fn king_origin(color: Color) -> Square {
    Square::at(color.back_rank(), 4)
}

/// Castling rights declared by a starting position.
///
/// These only restrict; whether a right survives the game so far is derived
/// from the move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses the castling field of a FEN string ("KQkq", "-").
    pub fn from_fen(field: &str) -> Self {
        let mut flags = 0u8;
        for c in field.chars() {
            match c {
                'K' => flags |= Self::WHITE_KINGSIDE,
                'Q' => flags |= Self::WHITE_QUEENSIDE,
                'k' => flags |= Self::BLACK_KINGSIDE,
                'q' => flags |= Self::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        CastlingRights::new(flags)
    }

    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if the given color may castle toward the given side.
    #[inline]
    pub const fn allows(self, color: Color, side: CastleSide) -> bool {
        (self.0 & Self::flag(color, side)) != 0
    }

    /// Removes one right.
    #[inline]
    pub fn remove(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Renders the rights as a FEN castling field.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::new();
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                s.push(c);
            }
        }
        s
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_rights() {
        let rights = CastlingRights::ALL;
        for color in Color::ALL {
            for side in CastleSide::ALL {
                assert!(rights.allows(color, side));
            }
        }
        assert!(!CastlingRights::new(0).allows(Color::White, CastleSide::Kingside));
    }

    #[test]
    fn remove_one_side() {
        let mut rights = CastlingRights::ALL;
        rights.remove(Color::White, CastleSide::Queenside);
        assert!(rights.allows(Color::White, CastleSide::Kingside));
        assert!(!rights.allows(Color::White, CastleSide::Queenside));
        assert!(rights.allows(Color::Black, CastleSide::Queenside));
    }

    #[test]
    fn fen_round_trip() {
        assert_eq!(CastlingRights::from_fen("KQkq"), CastlingRights::ALL);
        assert_eq!(CastlingRights::from_fen("-"), CastlingRights::new(0));
        assert_eq!(CastlingRights::from_fen("Kq").to_fen(), "Kq");
        assert_eq!(CastlingRights::new(0).to_fen(), "-");
    }

    #[test]
    fn geometry() {
        assert_eq!(
            CastleSide::Kingside.rook_origin(Color::White),
            Square::from_algebraic("h1").unwrap()
        );
        assert_eq!(
            CastleSide::Queenside.rook_origin(Color::Black),
            Square::from_algebraic("a8").unwrap()
        );
        assert_eq!(king_origin(Color::White), Square::from_algebraic("e1").unwrap());
        assert_eq!(CastleSide::from_file_delta(2), CastleSide::Kingside);
        assert_eq!(CastleSide::from_file_delta(-2), CastleSide::Queenside);
    }
}
