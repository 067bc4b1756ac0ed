//! Move generation.
//!
//! Generation is split in two tiers. The pseudo-legal tier follows piece
//! movement and occupancy rules only; [`attacks`] builds on the same
//! geometry for check detection. The legal tier filters pseudo-legal moves
//! by trying each one on a scratch grid and rejecting those that leave the
//! mover's king attacked, then adds castling.

mod attacks;
pub mod perft;

use crate::castling::{king_origin, CastleSide};
use crate::{Board, Grid};
use chess_core::{Color, Move, Piece, PieceKind, Square};

pub use attacks::{
    attacks, bishop_attacks, is_in_check, is_square_attacked, king_attacks, knight_attacks,
    pawn_attacks, queen_attacks, rook_attacks, slider_attacks,
};
use attacks::{BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

const NULL_MOVE: Move = Move::new(Square::at(0, 0), Square::at(0, 0));

impl MoveList {
    /// Maximum number of moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [NULL_MOVE; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    /// Appends every move of another list.
    pub fn extend_from(&mut self, other: &MoveList) {
        for &m in other {
            self.push(m);
        }
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates pseudo-legal moves for the piece on `from`.
///
/// Castling is not included: its eligibility depends on check detection,
/// which belongs to the legal tier.
pub fn pseudo_legal_moves(board: &Board, from: Square, moves: &mut MoveList) {
    let Some(piece) = board.get(from) else {
        return;
    };
    let grid = board.grid();
    match piece.kind {
        PieceKind::Pawn => {
            let ep = if piece.color == board.side_to_move() {
                board.en_passant_target()
            } else {
                None
            };
            generate_pawn_moves(grid, from, piece.color, ep, moves);
        }
        PieceKind::Knight => {
            generate_leaper_moves(grid, from, piece.color, &KNIGHT_OFFSETS, moves);
        }
        PieceKind::Bishop => {
            generate_slider_moves(grid, from, piece.color, &BISHOP_DIRECTIONS, moves);
        }
        PieceKind::Rook => generate_slider_moves(grid, from, piece.color, &ROOK_DIRECTIONS, moves),
        PieceKind::Queen => {
            generate_slider_moves(grid, from, piece.color, &ROOK_DIRECTIONS, moves);
            generate_slider_moves(grid, from, piece.color, &BISHOP_DIRECTIONS, moves);
        }
        PieceKind::King => generate_leaper_moves(grid, from, piece.color, &KING_OFFSETS, moves),
    }
}

fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut MoveList) {
    if to.rank() == color.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promoting(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(
    grid: &Grid,
    from: Square,
    color: Color,
    en_passant: Option<Square>,
    moves: &mut MoveList,
) {
    let dir = color.pawn_direction();

    // Single and double pushes
    if let Some(one) = from.offset(dir, 0).filter(|&sq| grid.is_empty(sq)) {
        push_pawn_move(from, one, color, moves);
        if from.rank() == color.pawn_rank() {
            if let Some(two) = one.offset(dir, 0).filter(|&sq| grid.is_empty(sq)) {
                moves.push(Move::new(from, two));
            }
        }
    }

    // Captures
    for to in pawn_attacks(from, color) {
        match grid.get(to) {
            Some(target) if target.color != color => push_pawn_move(from, to, color, moves),
            None if en_passant == Some(to) => {
                let passed = Square::at(from.rank(), to.file());
                if grid.get(passed) == Some(Piece::new(PieceKind::Pawn, color.opposite())) {
                    moves.push(Move::new(from, to));
                }
            }
            _ => {}
        }
    }
}

/// Generates moves for knights and kings: fixed offsets onto empty or
/// enemy-occupied cells.
fn generate_leaper_moves(
    grid: &Grid,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(dr, df) in offsets {
        if let Some(to) = from.offset(dr, df) {
            if grid.get(to).is_none_or(|p| p.color != color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

/// Generates moves along rays: stops before an own piece, stops on an
/// enemy piece.
fn generate_slider_moves(
    grid: &Grid,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(dr, df) in directions {
        let mut current = from;
        while let Some(to) = current.offset(dr, df) {
            match grid.get(to) {
                None => moves.push(Move::new(from, to)),
                Some(p) => {
                    if p.color != color {
                        moves.push(Move::new(from, to));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

/// Makes `mv` on `grid`, tests whether `color`'s king is attacked, and
/// restores every touched cell before returning.
fn leaves_king_in_check(grid: &mut Grid, mv: Move, color: Color) -> bool {
    let moving = grid.take(mv.from);
    let captured = grid.get(mv.to);

    // A pawn moving diagonally onto an empty cell is an en passant capture.
    let passed = match moving {
        Some(p) if p.kind == PieceKind::Pawn && mv.file_delta() != 0 && captured.is_none() => {
            let sq = Square::at(mv.from.rank(), mv.to.file());
            Some((sq, grid.take(sq)))
        }
        _ => None,
    };

    grid.set(mv.to, moving);
    let in_check = is_in_check(grid, color);

    grid.set(mv.to, captured);
    grid.set(mv.from, moving);
    if let Some((sq, piece)) = passed {
        grid.set(sq, piece);
    }
    in_check
}

/// Adds the castling moves available to the king on `from`.
fn generate_castling_moves(board: &Board, scratch: &mut Grid, from: Square, moves: &mut MoveList) {
    let Some(king) = board.get(from) else {
        return;
    };
    let color = king.color;
    if from != king_origin(color) || is_in_check(scratch, color) {
        return;
    }

    let rank = from.rank();
    for side in CastleSide::ALL {
        if !board.castling_right(color, side) {
            continue;
        }
        let blocked = side
            .between_files()
            .iter()
            .any(|&file| !scratch.is_empty(Square::at(rank, file)));
        if blocked {
            continue;
        }
        let attacked = side.king_path_files().iter().any(|&file| {
            leaves_king_in_check(scratch, Move::new(from, Square::at(rank, file)), color)
        });
        if !attacked {
            moves.push(Move::new(from, Square::at(rank, side.king_target_file())));
        }
    }
}

/// Generates the legal moves of the piece on `from`, whichever its color.
///
/// Returns an empty list for an empty square.
pub fn legal_moves_from(board: &Board, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    let Some(piece) = board.get(from) else {
        return moves;
    };

    let mut scratch = *board.grid();
    pseudo_legal_moves(board, from, &mut moves);
    moves.retain(|&m| !leaves_king_in_check(&mut scratch, m, piece.color));
    if piece.kind == PieceKind::King {
        generate_castling_moves(board, &mut scratch, from, &mut moves);
    }
    debug_assert_eq!(&scratch, board.grid());

    moves
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    for (from, _) in board.grid().pieces(board.side_to_move()) {
        moves.extend_from(&legal_moves_from(board, from));
    }
    moves
}

/// Returns true if the given color has at least one legal move.
pub fn has_legal_moves(board: &Board, color: Color) -> bool {
    board
        .grid()
        .pieces(color)
        .any(|(from, _)| !legal_moves_from(board, from).is_empty())
}

/// Returns true if `mv` would leave the mover's own king in check.
///
/// The board is left untouched.
pub fn would_be_in_check(board: &Board, mv: Move) -> bool {
    match board.get(mv.from) {
        Some(piece) => {
            let mut scratch = *board.grid();
            leaves_king_in_check(&mut scratch, mv, piece.color)
        }
        None => false,
    }
}
