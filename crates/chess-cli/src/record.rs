//! JSON export of a played game.

use anyhow::{Context, Result};
use chess_engine::{Game, GameStatus, MoveRecord};
use serde::Serialize;
use std::path::Path;

/// JSON representation of a game, as handed to other tools.
#[derive(Serialize)]
pub struct GameJson<'a> {
    /// Position before the first move.
    pub start_fen: String,
    /// Position after the last move.
    pub final_fen: String,
    pub status: GameStatus,
    /// Numbered move text, e.g. `1. e4 e5`.
    pub move_list: String,
    /// Every move with the piece moved, any capture, and its special effect.
    pub moves: &'a [MoveRecord],
}

impl<'a> GameJson<'a> {
    pub fn new(game: &'a Game) -> Self {
        GameJson {
            start_fen: game.start_position().to_fen(),
            final_fen: game.to_fen(),
            status: game.status(),
            move_list: game.move_list(),
            moves: game.history(),
        }
    }
}

/// Writes the game to `path` as pretty-printed JSON.
pub fn write_json(path: &Path, game: &Game) -> Result<()> {
    let json = serde_json::to_string_pretty(&GameJson::new(game))?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
