//! Board state: grid, side to move and move history.

use crate::castling::{king_origin, CastleSide, CastlingRights};
use crate::{GameError, Grid};
use chess_core::{Color, FenError, FenParser, Move, Piece, PieceKind, Square, SquareError};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Special effect a move had when it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFlag {
    /// Plain move or capture.
    Normal,
    /// Pawn advanced two ranks from its starting rank.
    DoublePush,
    /// King stepped two files and the rook jumped over it.
    Castle(CastleSide),
    /// Pawn captured a pawn that had just passed it.
    EnPassant,
}

/// A history entry: everything needed to take a move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The move as played, including any promotion kind.
    #[serde(rename = "move")]
    pub mv: Move,
    /// The piece that moved, as it was before the move.
    pub piece: Piece,
    /// The piece removed from the board, if any. For en passant this is
    /// the passed pawn, which did not stand on the destination.
    pub captured: Option<Piece>,
    pub flag: MoveFlag,
}

impl MoveRecord {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Square the captured piece was removed from.
    pub fn capture_square(&self) -> Option<Square> {
        match (self.captured, self.flag) {
            (None, _) => None,
            (Some(_), MoveFlag::EnPassant) => {
                Some(Square::at(self.mv.from.rank(), self.mv.to.file()))
            }
            (Some(_), _) => Some(self.mv.to),
        }
    }
}

/// The mutable game state: grid, side to move and append-only history.
///
/// `Board` applies whatever it is given; the rules in [`crate::movegen`]
/// decide what is legal. Castling rights and the en passant target are
/// not stored but derived from the history on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    side_to_move: Color,
    history: Vec<MoveRecord>,
    /// Rights declared by the starting position.
    start_castling: CastlingRights,
    /// En passant target declared by the starting position.
    start_en_passant: Option<Square>,
    start_halfmove: u32,
    start_fullmove: u32,
}

impl Board {
    /// The standard starting position, white to move, empty history.
    pub fn initial() -> Self {
        Board::from_grid(Grid::standard(), Color::White)
    }

    /// A position with the given grid and side to move and no history.
    ///
    /// Kings and rooks on their origin squares are treated as unmoved.
    pub fn from_grid(grid: Grid, side_to_move: Color) -> Self {
        Board {
            grid,
            side_to_move,
            history: Vec::new(),
            start_castling: CastlingRights::ALL,
            start_en_passant: None,
            start_halfmove: 0,
            start_fullmove: 1,
        }
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        Ok(Board {
            grid: Grid::from_cells(parsed.cells),
            side_to_move: parsed.active_color,
            history: Vec::new(),
            start_castling: CastlingRights::from_fen(&parsed.castling),
            start_en_passant: parsed.en_passant,
            start_halfmove: parsed.halfmove_clock,
            start_fullmove: parsed.fullmove_number.max(1),
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    #[inline]
    pub fn last_record(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Returns the piece at a raw coordinate pair.
    pub fn piece_at(&self, rank: i32, file: i32) -> Result<Option<Piece>, SquareError> {
        Ok(self.grid.get(Square::new(rank, file)?))
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.grid.get(sq)
    }

    /// Returns true if the king of `color` has made any move in this game.
    pub fn king_has_moved(&self, color: Color) -> bool {
        self.history
            .iter()
            .any(|r| r.piece.is(PieceKind::King, color))
    }

    /// Returns true if a rook of `color` has ever left the given side's
    /// origin square.
    pub fn rook_has_moved(&self, color: Color, side: CastleSide) -> bool {
        let origin = side.rook_origin(color);
        self.history
            .iter()
            .any(|r| r.piece.is(PieceKind::Rook, color) && r.mv.from == origin)
    }

    /// Returns true if castling toward `side` is still permitted for
    /// `color`, ignoring attacks and pieces in between.
    ///
    /// Requires the declared right, an unmoved king on its origin square,
    /// and an unmoved rook still standing on its origin square. A rook
    /// captured at home loses the right even if another rook arrives later.
    pub fn castling_right(&self, color: Color, side: CastleSide) -> bool {
        let rook_origin = side.rook_origin(color);
        self.start_castling.allows(color, side)
            && !self.king_has_moved(color)
            && !self.rook_has_moved(color, side)
            && !self.history.iter().any(|r| r.mv.to == rook_origin)
            && self.grid.get(king_origin(color)) == Some(Piece::new(PieceKind::King, color))
            && self.grid.get(rook_origin) == Some(Piece::new(PieceKind::Rook, color))
    }

    /// Current castling rights for both colors.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::ALL;
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if !self.castling_right(color, side) {
                    rights.remove(color, side);
                }
            }
        }
        rights
    }

    /// The square a pawn of the side to move may capture en passant onto.
    ///
    /// Only set on the ply immediately after an enemy double step.
    pub fn en_passant_target(&self) -> Option<Square> {
        match self.history.last() {
            Some(record) if record.flag == MoveFlag::DoublePush => {
                let passed = (record.mv.from.rank() + record.mv.to.rank()) / 2;
                Some(Square::at(passed, record.mv.from.file()))
            }
            Some(_) => None,
            None => self.start_en_passant,
        }
    }

    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        let mut clock = self.start_halfmove;
        for record in &self.history {
            if record.is_capture() || record.piece.kind == PieceKind::Pawn {
                clock = 0;
            } else {
                clock += 1;
            }
        }
        clock
    }

    /// Full move number, starting at 1 and incremented after Black moves.
    pub fn fullmove_number(&self) -> u32 {
        let offset = match self.start_side() {
            Color::White => 0,
            Color::Black => 1,
        };
        self.start_fullmove + (self.history.len() as u32 + offset) / 2
    }

    /// Full move number of the starting position.
    #[inline]
    pub fn start_fullmove(&self) -> u32 {
        self.start_fullmove
    }

    /// The side that was to move before any recorded history.
    pub fn start_side(&self) -> Color {
        if self.history.len() % 2 == 0 {
            self.side_to_move
        } else {
            self.side_to_move.opposite()
        }
    }

    /// Applies a move, records it, and passes the turn.
    ///
    /// The move is not checked for legality. Castling, en passant and
    /// promotion side effects are recognised from the move's shape:
    /// a king stepping two files castles, a pawn moving diagonally onto
    /// an empty cell captures en passant.
    pub fn apply(&mut self, mv: Move) -> Result<&MoveRecord, GameError> {
        let piece = self.grid.get(mv.from).ok_or(GameError::IllegalMove(mv))?;
        let target = self.grid.get(mv.to);

        let flag = match piece.kind {
            PieceKind::King if mv.file_delta().abs() == 2 => {
                MoveFlag::Castle(CastleSide::from_file_delta(mv.file_delta()))
            }
            PieceKind::Pawn if mv.file_delta() != 0 && target.is_none() => MoveFlag::EnPassant,
            PieceKind::Pawn if mv.rank_delta().abs() == 2 => MoveFlag::DoublePush,
            _ => MoveFlag::Normal,
        };

        self.grid.set(mv.from, None);
        let placed = match mv.promotion {
            Some(kind) => Piece::new(kind, piece.color),
            None => piece,
        };
        self.grid.set(mv.to, Some(placed));

        let captured = match flag {
            MoveFlag::Castle(side) => {
                let rank = mv.from.rank();
                let rook = self.grid.take(Square::at(rank, side.rook_origin_file()));
                self.grid.set(Square::at(rank, side.rook_target_file()), rook);
                target
            }
            MoveFlag::EnPassant => self.grid.take(Square::at(mv.from.rank(), mv.to.file())),
            _ => target,
        };

        trace!(%mv, ?flag, "applied move");
        self.side_to_move = self.side_to_move.opposite();
        self.history.push(MoveRecord {
            mv,
            piece,
            captured,
            flag,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// Takes back the most recent move exactly, including rook
    /// relocation and en passant restoration.
    pub fn undo_last(&mut self) -> Result<MoveRecord, GameError> {
        let record = self.history.pop().ok_or(GameError::NoHistory)?;
        let mv = record.mv;

        self.grid.set(mv.from, Some(record.piece));
        match record.flag {
            MoveFlag::Castle(side) => {
                let rank = mv.from.rank();
                self.grid.set(mv.to, None);
                let rook = self.grid.take(Square::at(rank, side.rook_target_file()));
                self.grid.set(Square::at(rank, side.rook_origin_file()), rook);
            }
            MoveFlag::EnPassant => {
                self.grid.set(mv.to, None);
                if let Some(square) = record.capture_square() {
                    self.grid.set(square, record.captured);
                }
            }
            MoveFlag::Normal | MoveFlag::DoublePush => {
                self.grid.set(mv.to, record.captured);
            }
        }

        trace!(%mv, "undid move");
        self.side_to_move = self.side_to_move.opposite();
        Ok(record)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        FenParser {
            cells: *self.grid.cells(),
            active_color: self.side_to_move,
            castling: self.castling_rights().to_fen(),
            en_passant: self.en_passant_target(),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
        }
        .to_fen()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.grid)?;
        write!(f, "{} to move", self.side_to_move)
    }
}
