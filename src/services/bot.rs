use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::settings::TelegramSettings;
use crate::dispatcher::Dispatcher;
use crate::parser::CommandParser;
use crate::store::SqliteSheet;
use crate::telegram::diagnostics::{INFO_COMMAND, message_info};
use crate::telegram::{Message, ReplyTarget, TelegramClient, Update};

/// Long-polling Telegram bot; the only consumer of the sheet while running
pub struct BotService {
    dispatcher: Dispatcher<SqliteSheet>,
    client: TelegramClient,
    parser: CommandParser,
    retry_delay: Duration,
    offset: i64,
}

impl BotService {
    pub fn new(dispatcher: Dispatcher<SqliteSheet>, settings: &TelegramSettings) -> Result<Self> {
        Ok(Self {
            dispatcher,
            client: TelegramClient::new(settings)?,
            parser: CommandParser::new()?,
            retry_delay: Duration::from_secs(settings.retry_delay_secs),
            offset: 0,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("=== Bot listening for commands ===");

        loop {
            match self.client.get_updates(self.offset).await {
                Ok(updates) => self.process_batch(updates).await,
                Err(e) => {
                    warn!("Polling failed: {e:#}");
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    async fn process_batch(&mut self, updates: Vec<Update>) {
        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }

        for update in updates {
            self.offset = next_offset(self.offset, &update);

            let Some(message) = from_person(&update) else {
                continue;
            };
            if let Some(text) = self.reply_for(message) {
                self.send(message.reply_target(), &text).await;
            }
        }
    }

    fn reply_for(&mut self, message: &Message) -> Option<String> {
        let command = message.to_command()?;

        if is_info_request(&self.parser, &command.text) {
            info!("/{} from @{}", INFO_COMMAND, command.actor);
            return Some(message_info(message, self.dispatcher.offset()));
        }
        self.dispatcher.handle(&command)
    }

    async fn send(&mut self, target: ReplyTarget, text: &str) {
        if let Err(e) = self.client.send_reply(target, text).await {
            warn!("Failed to reply in chat {}: {e:#}", target.chat_id);
        }
    }
}

/// Offset that acknowledges `update` on the next poll
fn next_offset(current: i64, update: &Update) -> i64 {
    current.max(update.update_id + 1)
}

/// The update's message, unless a bot sent it
fn from_person(update: &Update) -> Option<&Message> {
    update.message.as_ref().filter(|message| !message.is_from_bot())
}

fn is_info_request(parser: &CommandParser, text: &str) -> bool {
    parser
        .split(text)
        .is_some_and(|line| line.word.eq_ignore_ascii_case(INFO_COMMAND))
}
