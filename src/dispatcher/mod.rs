pub mod replies;

use std::panic::{AssertUnwindSafe, catch_unwind};

use anyhow::Result;
use chrono::FixedOffset;
use log::{error, info, warn};

use crate::config::Game;
use crate::domain::{IncomingCommand, ScoreRequest};
use crate::errors::CommandError;
use crate::parser::{self, CommandLine, CommandParser, Keyword};
use crate::reconciler::ScoreReconciler;
use crate::store::TabularStore;

/// Turns chat commands into sheet operations and reply texts
pub struct Dispatcher<S: TabularStore> {
    reconciler: ScoreReconciler<S>,
    parser: CommandParser,
    offset: FixedOffset,
}

impl<S: TabularStore> Dispatcher<S> {
    pub fn new(store: S, offset: FixedOffset) -> Result<Self> {
        Self::with_reconciler(ScoreReconciler::new(store), offset)
    }

    pub fn with_reconciler(reconciler: ScoreReconciler<S>, offset: FixedOffset) -> Result<Self> {
        Ok(Self {
            reconciler,
            parser: CommandParser::new()?,
            offset,
        })
    }

    pub fn offset(&self) -> &FixedOffset {
        &self.offset
    }

    pub fn reconciler(&self) -> &ScoreReconciler<S> {
        &self.reconciler
    }

    /// Reply for `command`, or `None` when the text is not a command.
    ///
    /// Failures never escape: every error becomes a reply text.
    pub fn handle(&mut self, command: &IncomingCommand) -> Option<String> {
        let line = self.parser.split(&command.text)?;
        info!("/{} from @{}", line.word, command.actor);

        let result = catch_unwind(AssertUnwindSafe(|| self.execute(&line, command)));
        let reply = match result {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => render_error(&err),
            Err(_) => {
                error!("Command /{} panicked: {:?}", line.word, command.text);
                replies::unexpected_failure()
            }
        };
        Some(reply)
    }

    fn execute(&mut self, line: &CommandLine, command: &IncomingCommand) -> Result<String, CommandError> {
        let Some(keyword) = line.keyword else {
            return Ok(replies::help());
        };

        if keyword.is_stateful() {
            self.reconciler.reload()?;
        }

        match keyword {
            Keyword::Start => Ok(replies::welcome()),
            Keyword::Help => Ok(replies::help()),
            Keyword::Lookup => self.lookup(&line.args),
            Keyword::Submit | Keyword::Adjust => self.score(keyword, &line.args, command),
        }
    }

    fn lookup(&self, args: &str) -> Result<String, CommandError> {
        let query = parser::parse_lookup_args(args)?;

        Ok(match self.reconciler.find(&query) {
            Some((row, player)) => replies::found(row, player),
            None => replies::player_not_found(),
        })
    }

    fn score(
        &mut self,
        keyword: Keyword,
        args: &str,
        command: &IncomingCommand,
    ) -> Result<String, CommandError> {
        let args = parser::parse_score_args(keyword, args)?;
        let game: Game = command.game.as_deref().unwrap_or_default().parse()?;

        let request = ScoreRequest {
            player: args.player,
            game,
            raw_score: args.score,
            actor: command.actor.clone(),
            timestamp: command.timestamp(&self.offset),
        };

        let outcome = if keyword == Keyword::Adjust {
            self.reconciler.adjust_score(&request)?
        } else {
            self.reconciler.submit_score(&request)?
        };
        Ok(replies::outcome(&outcome))
    }
}

fn render_error(err: &CommandError) -> String {
    if err.is_user_error() {
        info!("Rejected: {}", err);
    } else {
        warn!("Command failed: {}", err);
    }

    match err {
        CommandError::ArgumentArity { command, .. } => replies::usage(*command),
        CommandError::InvalidScore(raw) => replies::invalid_score(raw),
        CommandError::UnknownGame(topic) => replies::unknown_game(topic),
        CommandError::PlayerNotFound => replies::player_not_found(),
        CommandError::ColumnNotFound(_) | CommandError::Store(_) => {
            replies::store_failure(&err.to_string())
        }
    }
}
