use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;

use crate::domain::PlayerQuery;
use crate::errors::CommandError;

/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Start,
    Help,
    /// `/add`: submit an attempt
    Submit,
    /// `/busca`: look a player up
    Lookup,
    /// `/ajuste`: manual correction
    Adjust,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" | "ajuda" => Some(Self::Help),
            "add" => Some(Self::Submit),
            "busca" => Some(Self::Lookup),
            "ajuste" => Some(Self::Adjust),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Submit => "add",
            Self::Lookup => "busca",
            Self::Adjust => "ajuste",
        }
    }

    /// Whether the command reads or writes the sheet
    pub fn is_stateful(self) -> bool {
        matches!(self, Self::Submit | Self::Lookup | Self::Adjust)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A message split into its command word and argument text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub word: String,
    pub keyword: Option<Keyword>,
    pub args: String,
}

/// Player fields plus the raw score of an `/add` or `/ajuste`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreArgs {
    pub player: PlayerQuery,
    pub score: String,
}

pub struct CommandParser {
    command_regex: Regex,
}

impl CommandParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            command_regex: Self::compile_regex()?,
        })
    }

    /// Split `/word[@bot] args...`; returns `None` for plain chat text
    pub fn split(&self, text: &str) -> Option<CommandLine> {
        let captures = self.command_regex.captures(text.trim())?;
        let word = captures.get(1)?.as_str().to_string();
        let args = captures
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Some(CommandLine {
            keyword: Keyword::from_name(&word),
            word,
            args,
        })
    }

    fn compile_regex() -> Result<Regex> {
        Regex::new(r"(?s)^/([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?(?:\s+(.*))?$")
            .context("Failed to compile command regex")
    }
}

/// Comma-separated arguments, trimmed, empty entries dropped
pub fn tokenize(args: &str) -> Vec<String> {
    args.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Arguments of `/add` and `/ajuste`:
/// `id, score` | `name, contact, score` | `id, name, contact, score`
pub fn parse_score_args(keyword: Keyword, args: &str) -> Result<ScoreArgs, CommandError> {
    let tokens = tokenize(args);
    let found = tokens.len();

    let mut tokens = tokens.into_iter();
    let mut next = || tokens.next().unwrap_or_default();

    let (player, score) = match found {
        2 => (PlayerQuery::by_id(next()), next()),
        3 => (PlayerQuery::by_name_and_contact(next(), next()), next()),
        4 => {
            let player = PlayerQuery {
                id: Some(next()),
                name: Some(next()),
                contact: Some(next()),
            };
            (player, next())
        }
        _ => return Err(CommandError::ArgumentArity { command: keyword, found }),
    };

    Ok(ScoreArgs { player, score })
}

/// Arguments of `/busca`: `id` | `name, contact`
pub fn parse_lookup_args(args: &str) -> Result<PlayerQuery, CommandError> {
    let tokens = tokenize(args);

    match tokens.as_slice() {
        [id] => Ok(PlayerQuery::by_id(id.clone())),
        [name, contact] => Ok(PlayerQuery::by_name_and_contact(name.clone(), contact.clone())),
        _ => Err(CommandError::ArgumentArity {
            command: Keyword::Lookup,
            found: tokens.len(),
        }),
    }
}
