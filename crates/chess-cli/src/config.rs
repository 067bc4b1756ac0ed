//! Configuration file loading for the terminal front end.
//!
//! Settings come from `chess.toml`, looked up in the current directory and
//! then each parent, or from an explicit path. Every field has a default,
//! so an empty or missing file is a valid configuration.

use chess_core::Color;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// File name searched for when no path is given.
pub const CONFIG_FILE: &str = "chess.toml";

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Who plays which side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// One human against the bot.
    #[default]
    Bot,
    /// Two humans sharing the terminal.
    Hotseat,
    /// The bot plays both sides.
    SelfPlay,
}

/// The bot's color, as written in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    #[default]
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Front end settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    /// Time the bot is allowed per move, in milliseconds. Defaults to 3000.
    #[serde(default = "default_think_time_ms")]
    pub think_time_ms: u64,
    /// The bot never answers faster than this, in milliseconds. Defaults to 800.
    #[serde(default = "default_min_think_time_ms")]
    pub min_think_time_ms: u64,
    #[serde(default)]
    pub bot_color: Side,
    /// Seed for the bot's tie-breaking jitter; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_think_time_ms() -> u64 {
    3000
}

fn default_min_think_time_ms() -> u64 {
    800
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::default(),
            think_time_ms: default_think_time_ms(),
            min_think_time_ms: default_min_think_time_ms(),
            bot_color: Side::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// With an explicit path the file must exist. Without one, the first
    /// `chess.toml` found from the current directory upward is used, and
    /// defaults apply if there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let found = match path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|dir| Self::find_upward(&dir)),
        };
        match found {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Returns the first `chess.toml` in `start` or one of its ancestors.
    pub fn find_upward(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }

    pub fn min_think_time(&self) -> Duration {
        Duration::from_millis(self.min_think_time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mode, Mode::Bot);
        assert_eq!(config.think_time(), Duration::from_millis(3000));
        assert_eq!(config.min_think_time(), Duration::from_millis(800));
        assert_eq!(Color::from(config.bot_color), Color::Black);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parses_all_fields() {
        let toml_content = r#"
            mode = "self-play"
            think_time_ms = 500
            min_think_time_ms = 0
            bot_color = "white"
            seed = 42
        "#;
        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.mode, Mode::SelfPlay);
        assert_eq!(config.think_time_ms, 500);
        assert_eq!(config.min_think_time_ms, 0);
        assert_eq!(config.bot_color, Side::White);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn rejects_unknown_mode() {
        let result: Result<Config, _> = toml::from_str(r#"mode = "blitz""#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here/chess.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn finds_config_in_a_parent_directory() {
        let root = std::env::temp_dir().join(format!("chess-cli-config-{}", std::process::id()));
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join(CONFIG_FILE), "mode = \"hotseat\"\n").unwrap();

        let found = Config::find_upward(&nested).unwrap();
        assert_eq!(found, root.join(CONFIG_FILE));
        let config = Config::from_file(&found).unwrap();
        assert_eq!(config.mode, Mode::Hotseat);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
