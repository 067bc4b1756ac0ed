//! Terminal chess: play the bot, a friend, or watch the bot play itself.

mod config;
mod record;
mod session;

use anyhow::{Context, Result};
use chess_engine::Game;
use clap::Parser;
use config::{Config, Mode, Side};
use session::{Outcome, Session};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chess")]
#[command(about = "Play chess in the terminal")]
struct Cli {
    /// Configuration file (default: chess.toml in this or a parent directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Who plays: against the bot, two players, or bot against bot
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Side the bot plays in bot mode
    #[arg(long, value_enum)]
    bot_color: Option<Side>,

    /// Time the bot may spend per move, in milliseconds
    #[arg(short, long)]
    think_time: Option<u64>,

    /// Shortest time the bot takes to answer, in milliseconds
    #[arg(long)]
    min_think_time: Option<u64>,

    /// Seed for the bot's random tie-breaks
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this position instead of the initial one
    #[arg(long)]
    fen: Option<String>,

    /// Stop self-play after this many plies
    #[arg(long, default_value = "200")]
    max_plies: usize,

    /// Write the finished game to this file as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Cli {
    /// Command-line values take precedence over the file.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(side) = self.bot_color {
            config.bot_color = side;
        }
        if let Some(ms) = self.think_time {
            config.think_time_ms = ms;
        }
        if let Some(ms) = self.min_think_time {
            config.min_think_time_ms = ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    info!(?config, "starting");

    let mut game = match &cli.fen {
        Some(fen) => Game::from_fen(fen).with_context(|| format!("bad --fen {:?}", fen))?,
        None => Game::new(),
    };
    if let Some(seed) = config.seed {
        game = game.with_seed(seed);
    }

    let stdin = io::stdin();
    let mut session = Session::new(game, config.clone(), stdin.lock(), io::stdout());
    if config.mode == Mode::SelfPlay {
        session = session.with_max_plies(cli.max_plies);
    }
    let outcome = session.run()?;
    info!(?outcome, plies = session.game().history().len(), "session ended");
    if let Outcome::Finished(status) = outcome {
        println!("{}", status);
    }

    if let Some(path) = &cli.json {
        record::write_json(path, session.game())?;
        info!(path = %path.display(), "wrote game record");
    }
    Ok(())
}
