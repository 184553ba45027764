use chrono::{DateTime, FixedOffset};

use crate::config::games::{CONTACT_COLUMN, Game, ID_COLUMN, NAME_COLUMN};
use crate::store::Row;

/// A tracked participant, as stored in one worksheet row
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    row: Row,
}

impl PlayerRecord {
    pub fn new(row: Row) -> Self {
        Self { row }
    }

    pub fn id(&self) -> &str {
        self.row.get(ID_COLUMN)
    }

    pub fn name(&self) -> &str {
        self.row.get(NAME_COLUMN)
    }

    pub fn contact(&self) -> &str {
        self.row.get(CONTACT_COLUMN)
    }

    /// Stored best score; blank or unparseable cells count as zero
    pub fn score(&self, game: Game) -> f64 {
        parse_stored_score(self.row.get(game.columns().score))
    }

    pub fn raw_score(&self, game: Game) -> &str {
        self.row.get(game.columns().score)
    }

    pub fn timestamp(&self, game: Game) -> &str {
        self.row.get(game.columns().timestamp)
    }
}

pub fn parse_stored_score(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .unwrap_or(0.0)
}

/// Identifying fields a command may carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl PlayerQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_name_and_contact(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            contact: Some(contact.into()),
        }
    }
}

/// A score submission or adjustment, ready for the reconciler
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    pub player: PlayerQuery,
    pub game: Game,
    pub raw_score: String,
    pub actor: String,
    pub timestamp: String,
}

/// Result of a score operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created {
        id: usize,
        name: Option<String>,
        contact: Option<String>,
        game: Game,
        score: f64,
        actor: String,
        timestamp: String,
    },
    Updated {
        name: String,
        game: Game,
        previous: f64,
        current: f64,
        actor: String,
        timestamp: String,
    },
    Unchanged {
        name: String,
        game: Game,
        current: f64,
        attempted: f64,
    },
    Adjusted {
        name: String,
        game: Game,
        score: f64,
        actor: String,
        timestamp: String,
    },
}

/// A chat command as delivered by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingCommand {
    pub text: String,
    /// Name of the topic the message was sent in, when there is one
    pub game: Option<String>,
    pub actor: String,
    pub sent_at: i64,
}

impl IncomingCommand {
    /// Send time rendered the way it is written to the sheet
    pub fn timestamp(&self, offset: &FixedOffset) -> String {
        format_sent_at(self.sent_at, offset)
    }
}

/// Epoch seconds as `dd/mm/YYYY HH:MM:SS` in `offset`
pub fn format_sent_at(epoch: i64, offset: &FixedOffset) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|utc| utc.with_timezone(offset).format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch.to_string())
}
