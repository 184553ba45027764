use std::fmt;
use std::str::FromStr;

use crate::errors::CommandError;

pub const ID_COLUMN: &str = "Id";
pub const NAME_COLUMN: &str = "Nome";
pub const CONTACT_COLUMN: &str = "Contato (telegram/numero)";

/// Games tracked on the leaderboard.
///
/// Each game is a chat forum topic; the topic name selects the game and
/// therefore the pair of sheet columns a score is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    Touhou,
    GuitarHero,
    Chicken,
    Tetris,
}

/// Column names a game occupies in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameColumns {
    pub score: &'static str,
    pub timestamp: &'static str,
}

impl Game {
    pub const ALL: [Game; 4] = [Game::Touhou, Game::GuitarHero, Game::Chicken, Game::Tetris];

    pub fn name(self) -> &'static str {
        match self {
            Game::Touhou => "Touhou",
            Game::GuitarHero => "Guitar Hero",
            Game::Chicken => "Chicken",
            Game::Tetris => "Tetris",
        }
    }

    pub fn columns(self) -> GameColumns {
        match self {
            Game::Touhou => GameColumns {
                score: "Pontuação (Touhou)",
                timestamp: "Timestamp (Touhou)",
            },
            Game::GuitarHero => GameColumns {
                score: "Pontuação (Guitar Hero)",
                timestamp: "Timestamp (Guitar Hero)",
            },
            Game::Chicken => GameColumns {
                score: "Pontuação (Chicken)",
                timestamp: "Timestamp (Chicken)",
            },
            Game::Tetris => GameColumns {
                score: "Pontuação (Tetris)",
                timestamp: "Timestamp (Tetris)",
            },
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|game| game.name()).collect()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Game {
    type Err = CommandError;

    /// Topic names are matched ignoring case and surrounding whitespace
    fn from_str(topic: &str) -> Result<Self, Self::Err> {
        let wanted = topic.trim();
        Self::ALL
            .into_iter()
            .find(|game| game.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CommandError::UnknownGame(wanted.to_string()))
    }
}

/// Canonical header row of a leaderboard worksheet
pub fn canonical_header() -> Vec<String> {
    let mut header = vec![
        ID_COLUMN.to_string(),
        NAME_COLUMN.to_string(),
        CONTACT_COLUMN.to_string(),
    ];
    for game in Game::ALL {
        let columns = game.columns();
        header.push(columns.score.to_string());
        header.push(columns.timestamp.to_string());
    }
    header
}
