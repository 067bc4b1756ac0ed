//! The interactive play loop.
//!
//! A [`Session`] reads commands line by line, drives a [`Game`], and lets
//! the bot move whenever it is the bot's turn. Input and output are
//! generic so the loop can be scripted in tests.

use crate::config::{Config, Mode};
use anyhow::{Context, Result};
use chess_core::{Color, Move, PieceKind, Square};
use chess_engine::{notation, Game, GameStatus};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    /// List the legal moves of the piece on a square, or of every piece.
    Moves(Option<Square>),
    Undo,
    New,
    Board,
    Fen,
    Eval,
    History,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let mut words = line.split_whitespace();
        let first = words.next().ok_or_else(|| "empty command".to_string())?;
        let command = match first.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "?" => Command::Help,
            "undo" | "u" => Command::Undo,
            "new" | "reset" => Command::New,
            "board" | "b" => Command::Board,
            "fen" => Command::Fen,
            "eval" => Command::Eval,
            "history" | "moves-played" => Command::History,
            "moves" | "m" => match words.next() {
                None => Command::Moves(None),
                Some(word) => Square::from_algebraic(word)
                    .map(|square| Command::Moves(Some(square)))
                    .ok_or_else(|| format!("not a square: {}", word))?,
            },
            other => Move::from_uci(other)
                .map(Command::Move)
                .ok_or_else(|| format!("unknown command: {} (type help)", other))?,
        };
        Ok(command)
    }
}

const HELP: &str = "\
Commands:
  e2e4, e7e8q     play a move (from and to square, optional promotion)
  moves e2        list the legal moves of the piece on e2
  moves           list every legal move
  undo            take back a move (in bot mode, your move and the reply)
  new             start over
  board | fen | eval | history
  quit";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game reached checkmate or stalemate.
    Finished(GameStatus),
    /// The player quit or input ran out.
    Quit,
    /// Self-play reached its ply limit.
    PlyLimit,
}

enum Flow {
    Continue,
    Stop,
}

pub struct Session<R, W> {
    game: Game,
    config: Config,
    max_plies: Option<usize>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(game: Game, config: Config, input: R, output: W) -> Self {
        Session {
            game,
            config,
            max_plies: None,
            input,
            output,
        }
    }

    /// Stops self-play after this many plies.
    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = Some(max_plies);
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn bot_color(&self) -> Color {
        self.config.bot_color.into()
    }

    fn is_bot_turn(&self) -> bool {
        match self.config.mode {
            Mode::Bot => self.game.side_to_move() == self.bot_color(),
            Mode::Hotseat => false,
            Mode::SelfPlay => true,
        }
    }

    /// Runs until the game ends, the player quits, or input runs out.
    pub fn run(&mut self) -> Result<Outcome> {
        info!(mode = ?self.config.mode, "session started");
        self.show_board()?;

        loop {
            if let Some(limit) = self.max_plies {
                if self.game.history().len() >= limit {
                    writeln!(self.output, "Stopping after {} plies.", limit)?;
                    return Ok(Outcome::PlyLimit);
                }
            }

            let status = self.game.status();
            if status.is_over() && self.config.mode == Mode::SelfPlay {
                return Ok(Outcome::Finished(status));
            }

            if !status.is_over() && self.is_bot_turn() {
                self.bot_move()?;
                continue;
            }

            if status.is_over() {
                writeln!(self.output, "Type undo, new or quit.")?;
            }
            write!(self.output, "{}> ", self.game.side_to_move())?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(match self.game.status() {
                    s if s.is_over() => Outcome::Finished(s),
                    _ => Outcome::Quit,
                });
            };
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Ok(command) => {
                    if let Flow::Stop = self.execute(command)? {
                        return Ok(Outcome::Quit);
                    }
                }
                Err(message) => writeln!(self.output, "{}", message)?,
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        Ok((read > 0).then_some(line))
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Move(mv) => self.human_move(mv)?,
            Command::Moves(square) => self.list_moves(square)?,
            Command::Undo => self.undo()?,
            Command::New => {
                self.game.reset();
                writeln!(self.output, "New game.")?;
                self.show_board()?;
            }
            Command::Board => self.show_board()?,
            Command::Fen => writeln!(self.output, "{}", self.game.to_fen())?,
            Command::Eval => writeln!(
                self.output,
                "Material {:+.2} (white {:.0}%)",
                self.game.evaluation(),
                self.game.white_percentage()
            )?,
            Command::History => writeln!(self.output, "{}", self.game.move_list())?,
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Stop),
        }
        Ok(Flow::Continue)
    }

    fn human_move(&mut self, mut mv: Move) -> Result<()> {
        if self.game.status().is_over() {
            writeln!(self.output, "The game is over: {}", self.game.status())?;
            return Ok(());
        }
        if mv.promotion.is_none() && self.needs_promotion(mv) {
            match self.ask_promotion()? {
                Some(kind) => mv.promotion = Some(kind),
                None => return Ok(()),
            }
        }
        match self.game.play(mv) {
            Ok(_) => self.after_move(),
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                Ok(())
            }
        }
    }

    fn needs_promotion(&self, mv: Move) -> bool {
        self.game
            .legal_moves(i32::from(mv.from.rank()), i32::from(mv.from.file()))
            .map(|moves| {
                moves
                    .iter()
                    .any(|m| m.to == mv.to && m.promotion.is_some())
            })
            .unwrap_or(false)
    }

    fn ask_promotion(&mut self) -> Result<Option<PieceKind>> {
        loop {
            write!(self.output, "Promote to (q/r/b/n): ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let choice = line
                .trim()
                .chars()
                .next()
                .and_then(PieceKind::from_char)
                .filter(|kind| kind.is_promotion_target());
            match choice {
                Some(kind) => return Ok(Some(kind)),
                None => writeln!(self.output, "Choose one of q, r, b or n.")?,
            }
        }
    }

    fn bot_move(&mut self) -> Result<()> {
        let started = Instant::now();
        let Some(mv) = self.game.select_move(self.config.think_time()) else {
            return Ok(());
        };
        let elapsed = started.elapsed();
        let floor = self.config.min_think_time();
        if elapsed < floor {
            std::thread::sleep(floor - elapsed);
        }
        debug!(%mv, thought_ms = started.elapsed().as_millis() as u64, "bot moved");

        self.game
            .play(mv)
            .with_context(|| format!("bot chose an illegal move {}", mv))?;
        let text = self
            .game
            .last_move()
            .map(notation::record_to_text)
            .unwrap_or_default();
        writeln!(self.output, "Bot plays {} ({})", mv, text)?;
        self.after_move()
    }

    fn undo(&mut self) -> Result<()> {
        // In bot mode the bot's reply goes too, unless the game ended
        // before it could answer.
        let plies = match self.config.mode {
            Mode::Bot if self.game.side_to_move() != self.bot_color() => 2,
            _ => 1,
        };
        if self.game.history().len() < plies {
            writeln!(self.output, "Nothing to undo.")?;
            return Ok(());
        }
        for _ in 0..plies {
            let record = self.game.undo()?;
            debug!(mv = %record.mv, "took back");
        }
        self.show_board()
    }

    fn list_moves(&mut self, square: Option<Square>) -> Result<()> {
        let moves = match square {
            Some(square) => self
                .game
                .legal_moves(i32::from(square.rank()), i32::from(square.file()))?,
            None => self.game.all_legal_moves().as_slice().to_vec(),
        };
        if moves.is_empty() {
            match square {
                Some(square) => writeln!(self.output, "No legal moves from {}.", square)?,
                None => writeln!(self.output, "No legal moves.")?,
            }
        } else {
            let list: Vec<String> = moves.iter().map(|mv| mv.to_uci()).collect();
            writeln!(self.output, "{}", list.join(" "))?;
        }
        Ok(())
    }

    fn after_move(&mut self) -> Result<()> {
        self.show_board()?;
        match self.game.status() {
            GameStatus::Active if self.game.is_check() => writeln!(self.output, "Check!")?,
            GameStatus::Active => {}
            status => {
                writeln!(self.output, "{}", status)?;
                writeln!(self.output, "{}", self.game.move_list())?;
                info!(%status, plies = self.game.history().len(), "game over");
            }
        }
        Ok(())
    }

    fn show_board(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}\n", self.game.board())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config(mode: Mode) -> Config {
        Config {
            mode,
            think_time_ms: 50,
            min_think_time_ms: 0,
            seed: Some(5),
            ..Config::default()
        }
    }

    fn run(game: Game, mode: Mode, script: &str) -> (Outcome, Game, String) {
        let mut output = Vec::new();
        let input = Cursor::new(script.to_string());
        let mut session = Session::new(game, config(mode), input, &mut output);
        let outcome = session.run().unwrap();
        let game = session.game().clone();
        drop(session);
        (outcome, game, String::from_utf8(output).unwrap())
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            Command::parse("e2e4"),
            Ok(Command::Move(Move::from_uci("e2e4").unwrap()))
        );
        assert_eq!(
            Command::parse("moves e2"),
            Ok(Command::Moves(Some(Square::from_algebraic("e2").unwrap())))
        );
        assert_eq!(Command::parse("moves"), Ok(Command::Moves(None)));
        assert!(Command::parse("moves z9").is_err());
        assert_eq!(Command::parse("  UNDO "), Ok(Command::Undo));
        assert!(Command::parse("castle").is_err());
    }

    #[test]
    fn hotseat_fools_mate() {
        let (outcome, game, output) = run(Game::new(), Mode::Hotseat, "f2f3\ne7e5\ng2g4\nd8h4\n");
        assert_eq!(
            outcome,
            Outcome::Finished(GameStatus::Checkmate(Color::Black))
        );
        assert_eq!(game.history().len(), 4);
        assert!(output.contains("Black wins by checkmate"));
        assert!(output.contains("1. f3 e5 2. g4 Qh4"));
    }

    #[test]
    fn illegal_input_is_reported() {
        let (outcome, game, output) = run(Game::new(), Mode::Hotseat, "e2e5\nhello\nquit\n");
        assert_eq!(outcome, Outcome::Quit);
        assert!(game.history().is_empty());
        assert!(output.contains("illegal move: e2e5"));
        assert!(output.contains("unknown command: hello"));
    }

    #[test]
    fn bot_replies_and_undo_takes_back_both() {
        let (outcome, game, output) = run(Game::new(), Mode::Bot, "e2e4\nundo\nquit\n");
        assert_eq!(outcome, Outcome::Quit);
        let announcement = output.lines().find(|line| line.contains("Bot plays")).unwrap();
        // Coordinates first, then the short algebraic form in parentheses.
        assert!(announcement.ends_with(')'));
        assert!(!announcement.contains("()"));
        assert!(game.history().is_empty());
    }

    #[test]
    fn promotion_prompt() {
        let game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let (_, game, output) = run(game, Mode::Hotseat, "a7a8\nx\nn\nquit\n");
        assert!(output.contains("Promote to"));
        assert!(output.contains("Choose one of"));
        assert_eq!(
            game.last_move().and_then(|r| r.mv.promotion),
            Some(PieceKind::Knight)
        );
    }

    #[test]
    fn self_play_stops_at_the_ply_limit() {
        let mut output = Vec::new();
        let game = Game::new().with_seed(5);
        let input = Cursor::new(String::new());
        let mut session =
            Session::new(game, config(Mode::SelfPlay), input, &mut output).with_max_plies(6);
        assert_eq!(session.run().unwrap(), Outcome::PlyLimit);
        assert_eq!(session.game().history().len(), 6);
    }

    #[test]
    fn list_moves_command() {
        let (_, _, output) = run(Game::new(), Mode::Hotseat, "moves g1\nmoves e4\nquit\n");
        let knight_line = output.lines().find(|line| line.contains("g1f3")).unwrap();
        // The prompt shares the line with the listing.
        let mut listed: Vec<&str> = knight_line
            .split_whitespace()
            .filter(|word| word.starts_with("g1"))
            .collect();
        listed.sort_unstable();
        assert_eq!(listed, ["g1f3", "g1h3"]);
        assert!(output.contains("No legal moves from e4."));
    }

    #[test]
    fn bare_moves_lists_the_whole_side() {
        let (_, _, output) = run(Game::new(), Mode::Hotseat, "moves\nquit\n");
        let listing = output.lines().find(|line| line.contains("g1f3")).unwrap();
        let count = listing
            .split_whitespace()
            .filter(|word| Move::from_uci(word).is_some())
            .count();
        assert_eq!(count, 20);
    }
}
