use crate::config::Game;
use crate::errors::CommandError;

/// Header row of a worksheet, used to turn column names into 1-based positions
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    header: Vec<String>,
}

/// Physical positions of one game's score and timestamp columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePositions {
    pub score: usize,
    pub timestamp: usize,
}

impl ColumnIndex {
    pub fn new(header: Vec<String>) -> Self {
        Self { header }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn position(&self, column: &str) -> Result<usize, CommandError> {
        self.header
            .iter()
            .position(|name| name == column)
            .map(|idx| idx + 1)
            .ok_or_else(|| CommandError::ColumnNotFound(column.to_string()))
    }

    pub fn game(&self, game: Game) -> Result<GamePositions, CommandError> {
        let columns = game.columns();
        Ok(GamePositions {
            score: self.position(columns.score)?,
            timestamp: self.position(columns.timestamp)?,
        })
    }
}
