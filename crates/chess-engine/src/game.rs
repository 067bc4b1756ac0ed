//! Game management: the interface a presentation layer drives.
//!
//! [`Game`] owns a [`Board`] and keeps its status in step with it. Moves
//! go in through [`Game::apply_move`], which only accepts moves the rules
//! engine generated; everything else is read access.

use crate::evaluation::{material_balance, normalized_eval, white_percentage};
use crate::movegen::{generate_moves, is_in_check, legal_moves_from};
use crate::notation::move_list;
use crate::rules::{game_status, GameStatus};
use crate::selector::MoveSelector;
use crate::{Board, MoveList, MoveRecord};
use chess_core::{Color, FenError, Move, Piece, PieceKind, Square, SquareError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A coordinate fell outside the board.
    #[error(transparent)]
    OutOfBounds(#[from] SquareError),
    /// The move is not among the legal moves from its origin.
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    /// Undo was requested with no moves played.
    #[error("no move to undo")]
    NoHistory,
    /// The starting position could not be parsed.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),
    /// A move string was not in long algebraic form.
    #[error("invalid UCI move: {0:?}")]
    InvalidUci(String),
}

/// A chess game with history, status and an automated opponent.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    /// The position the game started from, restored by [`Game::reset`].
    start: Board,
    status: GameStatus,
    selector: MoveSelector,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::initial())
    }

    /// Creates a game from a position with no history.
    pub fn from_board(board: Board) -> Self {
        let status = game_status(&board);
        Game {
            start: board.clone(),
            board,
            status,
            selector: MoveSelector::new(),
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    /// Replaces the opponent's random source with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.selector = MoveSelector::seeded(seed);
        self
    }

    /// Returns to the starting position and clears the history.
    pub fn reset(&mut self) {
        self.board = self.start.clone();
        self.status = game_status(&self.board);
        debug!("game reset");
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The position the game started from.
    #[inline]
    pub fn start_position(&self) -> &Board {
        &self.start
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Returns the piece at the given rank and file.
    pub fn piece_at(&self, rank: i32, file: i32) -> Result<Option<Piece>, GameError> {
        Ok(self.board.piece_at(rank, file)?)
    }

    /// Legal moves of the piece at the given rank and file.
    ///
    /// Empty for an empty cell or a piece of the side not to move.
    pub fn legal_moves(&self, rank: i32, file: i32) -> Result<Vec<Move>, GameError> {
        let from = Square::new(rank, file)?;
        Ok(self.moves_from(from).as_slice().to_vec())
    }

    /// Every legal move for the side to move.
    pub fn all_legal_moves(&self) -> MoveList {
        generate_moves(&self.board)
    }

    fn moves_from(&self, from: Square) -> MoveList {
        match self.board.get(from) {
            Some(piece) if piece.color == self.board.side_to_move() => {
                legal_moves_from(&self.board, from)
            }
            _ => MoveList::new(),
        }
    }

    /// Returns true if `mv` is legal in the current position.
    pub fn is_legal(&self, mv: Move) -> bool {
        self.status == GameStatus::Active && self.moves_from(mv.from).contains(&mv)
    }

    /// Plays a move and returns the resulting status.
    ///
    /// A pawn reaching the last rank needs a promotion kind; any other
    /// move must not carry one.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<GameStatus, GameError> {
        let mv = Move {
            from,
            to,
            promotion,
        };
        if !self.is_legal(mv) {
            return Err(GameError::IllegalMove(mv));
        }

        self.board.apply(mv)?;
        self.refresh_status();
        Ok(self.status)
    }

    /// Plays a [`Move`].
    pub fn play(&mut self, mv: Move) -> Result<GameStatus, GameError> {
        self.apply_move(mv.from, mv.to, mv.promotion)
    }

    /// Plays a move given in UCI notation, e.g. `e2e4` or `e7e8q`.
    pub fn apply_uci(&mut self, uci: &str) -> Result<GameStatus, GameError> {
        let mv = Move::from_uci(uci).ok_or_else(|| GameError::InvalidUci(uci.to_string()))?;
        self.play(mv)
    }

    /// Takes back the last move.
    pub fn undo(&mut self) -> Result<MoveRecord, GameError> {
        let record = self.board.undo_last()?;
        self.refresh_status();
        Ok(record)
    }

    fn refresh_status(&mut self) {
        let status = game_status(&self.board);
        if status != self.status {
            debug!(from = %self.status, to = %status, "status changed");
        }
        self.status = status;
    }

    /// Chooses a move for the side to move, using at most a fraction of
    /// `allowance`. The game is not changed; the caller plays the move.
    pub fn select_move(&mut self, allowance: Duration) -> Option<Move> {
        self.selector.select(&self.board, allowance)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_in_check(self.board.grid(), self.board.side_to_move())
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        self.board.history()
    }

    #[inline]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.board.last_record()
    }

    /// The moves played so far, numbered in pairs: `1. e4 e5 2. Nf3`.
    pub fn move_list(&self) -> String {
        move_list(
            self.board.history(),
            self.board.start_fullmove(),
            self.board.start_side() == Color::Black,
        )
    }

    /// Material balance in centipawns, white minus black.
    pub fn material_balance(&self) -> i32 {
        material_balance(self.board.grid())
    }

    /// Material balance divided by 1000.
    pub fn evaluation(&self) -> f64 {
        normalized_eval(self.board.grid())
    }

    /// White's share of an evaluation bar, 0 to 100.
    pub fn white_percentage(&self) -> f64 {
        white_percentage(self.board.grid())
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.status(), GameStatus::Active);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.all_legal_moves().len(), 20);
        assert!(game.history().is_empty());
        assert!(!game.is_check());
    }

    #[test]
    fn legal_moves_by_coordinates() {
        let game = Game::new();
        // e2 is rank 6, file 4.
        let moves = game.legal_moves(6, 4).unwrap();
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&Move::new(sq("e2"), sq("e4"))));

        // Black pieces do not move on white's turn.
        assert!(game.legal_moves(1, 4).unwrap().is_empty());
        assert!(game.legal_moves(4, 4).unwrap().is_empty());
    }

    #[test]
    fn out_of_bounds() {
        let game = Game::new();
        assert!(matches!(game.legal_moves(8, 0), Err(GameError::OutOfBounds(_))));
        assert!(matches!(game.piece_at(0, -1), Err(GameError::OutOfBounds(_))));
        assert_eq!(
            game.piece_at(7, 4).unwrap(),
            Some(Piece::new(PieceKind::King, Color::White))
        );
    }

    #[test]
    fn apply_and_undo() {
        let mut game = Game::new();
        let status = game.apply_move(sq("e2"), sq("e4"), None).unwrap();
        assert_eq!(status, GameStatus::Active);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.last_move().map(|r| r.mv), Some(Move::new(sq("e2"), sq("e4"))));

        let record = game.undo().unwrap();
        assert_eq!(record.mv.to, sq("e4"));
        assert_eq!(game.board(), &Board::initial());
        assert_eq!(game.undo(), Err(GameError::NoHistory));
    }

    #[test]
    fn illegal_move() {
        let mut game = Game::new();
        let err = game.apply_move(sq("e2"), sq("e5"), None).unwrap_err();
        assert_eq!(err, GameError::IllegalMove(Move::new(sq("e2"), sq("e5"))));
        assert_eq!(err.to_string(), "illegal move: e2e5");
        // Moving out of turn.
        assert!(game.apply_uci("e7e5").is_err());
        assert!(game.history().is_empty());
    }

    #[test]
    fn invalid_uci() {
        let mut game = Game::new();
        assert_eq!(
            game.apply_uci("e2"),
            Err(GameError::InvalidUci("e2".to_string()))
        );
    }

    #[test]
    fn promotion_kind_is_required() {
        let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(game.apply_move(sq("a7"), sq("a8"), None).is_err());
        assert!(game
            .apply_move(sq("a7"), sq("a8"), Some(PieceKind::King))
            .is_err());
        game.apply_move(sq("a7"), sq("a8"), Some(PieceKind::Knight))
            .unwrap();
        assert_eq!(
            game.board().get(sq("a8")),
            Some(Piece::new(PieceKind::Knight, Color::White))
        );

        // A promotion kind on an ordinary move is rejected too.
        assert!(game
            .apply_move(sq("e8"), sq("d8"), Some(PieceKind::Queen))
            .is_err());
    }

    #[test]
    fn checkmate_fools_mate() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4"] {
            game.apply_uci(uci).unwrap();
        }
        let status = game.apply_uci("d8h4").unwrap();
        assert_eq!(status, GameStatus::Checkmate(Color::Black));
        assert!(game.is_check());
        assert!(game.all_legal_moves().is_empty());

        // No further moves once the game is over.
        assert!(game.apply_uci("e2e3").is_err());

        game.undo().unwrap();
        assert_eq!(game.status(), GameStatus::Active);
    }

    #[test]
    fn stalemate() {
        let mut game = Game::from_fen("7k/8/6K1/5Q2/8/8/8/8 w - - 0 1").unwrap();
        let status = game.apply_uci("f5f7").unwrap();
        assert_eq!(status, GameStatus::Stalemate);
        assert!(!game.is_check());
    }

    #[test]
    fn from_fen_errors() {
        assert!(matches!(
            Game::from_fen("not a fen"),
            Err(GameError::InvalidFen(_))
        ));
    }

    #[test]
    fn reset_restores_start() {
        let mut game = Game::new();
        game.apply_uci("e2e4").unwrap();
        game.apply_uci("e7e5").unwrap();
        game.reset();
        assert!(game.history().is_empty());
        assert_eq!(game.to_fen(), chess_core::FenParser::STARTPOS);
    }

    #[test]
    fn move_list_and_evaluation() {
        let mut game = Game::new();
        for uci in ["e2e4", "d7d5", "e4d5", "d8d5"] {
            game.apply_uci(uci).unwrap();
        }
        assert_eq!(game.move_list(), "1. e4 d5 2. exd5 Qxd5");
        assert_eq!(game.material_balance(), 0);
        assert_eq!(game.white_percentage(), 50.0);

        game.undo().unwrap();
        assert_eq!(game.material_balance(), 100);
        assert!((game.evaluation() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn select_move_is_legal_and_read_only() {
        let mut game = Game::new().with_seed(11);
        let fen = game.to_fen();
        let mv = game.select_move(Duration::from_millis(200)).unwrap();
        assert!(game.is_legal(mv));
        assert_eq!(game.to_fen(), fen);
        game.play(mv).unwrap();
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn cloned_games_select_independently() {
        let mut game = Game::new().with_seed(5);
        game.apply_uci("e2e4").unwrap();
        let mut copy = game.clone();

        let mv = game.select_move(Duration::from_secs(1)).unwrap();
        assert_eq!(copy.select_move(Duration::from_secs(1)), Some(mv));

        copy.play(mv).unwrap();
        assert_eq!(copy.history().len(), 2);
        assert_eq!(game.history().len(), 1);
        assert!(game.select_move(Duration::from_secs(1)).is_some());
    }
}
