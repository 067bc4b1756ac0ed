//! FEN (Forsyth-Edwards Notation) parsing.
//!
//! Piece placement and active color are required. The castling, en passant
//! and clock fields may be omitted, in which case they default to `KQkq`,
//! `-`, `0` and `1`.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN needs 2 to 6 space-separated fields, found {0}")]
    InvalidPartCount(usize),

    #[error("bad piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("side to move must be 'w' or 'b', found {0:?}")]
    InvalidActiveColor(String),

    #[error("bad castling field {0:?}")]
    InvalidCastlingRights(String),

    #[error("bad en passant field {0:?}")]
    InvalidEnPassantSquare(String),

    #[error("bad halfmove clock {0:?}")]
    InvalidHalfmoveClock(String),

    #[error("bad fullmove number {0:?}")]
    InvalidFullmoveNumber(String),
}

type Cells = [[Option<Piece>; 8]; 8];

/// Parsed FEN data.
///
/// `cells[rank][file]` uses the engine's grid coordinates: the first FEN
/// rank (rank 8) lands in `cells[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    pub cells: Cells,
    pub active_color: Color,
    /// Castling availability as written (e.g., "KQkq", "-").
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let count = fen.split_whitespace().count();
        if !(2..=6).contains(&count) {
            return Err(FenError::InvalidPartCount(count));
        }
        let mut fields = fen.split_whitespace();
        let mut next = |default: &'static str| fields.next().unwrap_or(default);

        let cells = parse_placement(next(""))?;
        let active_color = parse_color(next(""))?;
        let castling = parse_castling(next("KQkq"))?;
        let en_passant = parse_en_passant(next("-"))?;
        let halfmove = next("0");
        let halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?;
        let fullmove = next("1");
        let fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::InvalidFullmoveNumber(fullmove.to_string()))?;

        Ok(FenParser {
            cells,
            active_color,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Renders a grid as the piece placement field of a FEN string.
    pub fn placement_string(cells: &Cells) -> String {
        let rows: Vec<String> = cells
            .iter()
            .map(|row| {
                let mut out = String::with_capacity(8);
                let mut gap = 0u8;
                for cell in row {
                    match cell {
                        None => gap += 1,
                        Some(piece) => {
                            if gap > 0 {
                                out.push(char::from(b'0' + gap));
                                gap = 0;
                            }
                            out.push(piece.to_fen_char());
                        }
                    }
                }
                if gap > 0 {
                    out.push(char::from(b'0' + gap));
                }
                out
            })
            .collect();
        rows.join("/")
    }

    /// Converts the parsed FEN back to a full six-field FEN string.
    pub fn to_fen(&self) -> String {
        let side = match self.active_color {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), Square::to_algebraic);
        format!(
            "{} {} {} {} {} {}",
            Self::placement_string(&self.cells),
            side,
            self.castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_placement(field: &str) -> Result<Cells, FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "{} rows instead of 8",
            rows.len()
        )));
    }

    let mut cells: Cells = [[None; 8]; 8];
    for (rank, row) in rows.into_iter().enumerate() {
        let mut file = 0usize;
        for c in row.chars() {
            match (c.to_digit(10), Piece::from_fen_char(c)) {
                (Some(gap @ 1..=8), _) => file += gap as usize,
                (None, Some(piece)) if file < 8 => {
                    cells[rank][file] = Some(piece);
                    file += 1;
                }
                (None, Some(_)) => file += 1,
                _ => {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "unexpected {:?} in row {:?}",
                        c, row
                    )))
                }
            }
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "row {:?} covers {} files",
                row, file
            )));
        }
    }
    Ok(cells)
}

fn parse_color(field: &str) -> Result<Color, FenError> {
    match field {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        other => Err(FenError::InvalidActiveColor(other.to_string())),
    }
}

fn parse_castling(field: &str) -> Result<String, FenError> {
    if field == "-" || field.chars().all(|c| matches!(c, 'K' | 'Q' | 'k' | 'q')) {
        Ok(field.to_string())
    } else {
        Err(FenError::InvalidCastlingRights(field.to_string()))
    }
}

/// The target square must sit behind a pawn that just double-stepped:
/// algebraic rank 3 or 6.
fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    Square::from_algebraic(field)
        .filter(|sq| matches!(sq.rank_char(), '3' | '6'))
        .map(Some)
        .ok_or_else(|| FenError::InvalidEnPassantSquare(field.to_string()))
}
