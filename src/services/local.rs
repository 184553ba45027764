use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

use crate::config::settings::StoreSettings;
use crate::config::{AppConfig, canonical_header};
use crate::directory::PlayerDirectory;
use crate::dispatcher::Dispatcher;
use crate::domain::IncomingCommand;
use crate::reconciler::ScoreReconciler;
use crate::store::setup::{create_worksheet, ensure_schema};
use crate::store::{DbPool, MemorySheet, SqliteSheet, TabularStore, create_pool, get_connection};

/// One command typed at the terminal instead of sent through the chat
#[derive(Debug, Clone)]
pub struct LocalCommand {
    pub text: String,
    pub game: Option<String>,
    pub actor: String,
    /// Send time in epoch seconds; now when absent
    pub at: Option<i64>,
    /// Run against a throwaway sheet holding only the header
    pub memory: bool,
}

impl LocalCommand {
    fn to_incoming(&self) -> IncomingCommand {
        IncomingCommand {
            text: self.text.clone(),
            game: self.game.clone(),
            actor: self.actor.clone(),
            sent_at: self.at.unwrap_or_else(|| Utc::now().timestamp()),
        }
    }
}

/// Open the configured worksheet of the SQLite document
pub fn open_sheet(store: &StoreSettings) -> Result<SqliteSheet> {
    let pool = create_pool(&store.database_path)?;
    let sheet = SqliteSheet::open(pool, &store.sheet_name)
        .with_context(|| format!("Cannot open {}", store.database_path))?;
    Ok(sheet)
}

/// Dispatcher over `store` with the configured match policy and clock
pub fn build_dispatcher<S: TabularStore>(store: S, config: &AppConfig) -> Result<Dispatcher<S>> {
    let directory = PlayerDirectory::with_policy(config.store.match_policy);
    let reconciler = ScoreReconciler::with_directory(store, directory);
    Dispatcher::with_reconciler(reconciler, config.clock.offset()?)
}

/// Create the document schema and the worksheet with the canonical header
pub fn init(store: &StoreSettings) -> Result<bool> {
    let pool = create_pool(&store.database_path)?;
    initialise(&pool, &store.sheet_name)
}

fn initialise(pool: &DbPool, sheet: &str) -> Result<bool> {
    let mut conn = get_connection(pool)?;
    ensure_schema(&mut conn)?;
    create_worksheet(&mut conn, sheet, &canonical_header())
}

/// Handle one command and return the reply the chat would have received
pub fn exec(config: &AppConfig, command: &LocalCommand) -> Result<Option<String>> {
    if command.memory {
        info!("Running against an empty in-memory sheet");
        run_once(MemorySheet::new(canonical_header()), config, command)
    } else {
        run_once(open_sheet(&config.store)?, config, command)
    }
}

fn run_once<S: TabularStore>(
    store: S,
    config: &AppConfig,
    command: &LocalCommand,
) -> Result<Option<String>> {
    let mut dispatcher = build_dispatcher(store, config)?;
    Ok(dispatcher.handle(&command.to_incoming()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MatchPolicy;
    use crate::store::connection::create_memory_pool;

    fn command(text: &str) -> LocalCommand {
        LocalCommand {
            text: text.to_string(),
            game: Some("Chicken".to_string()),
            actor: "terminal".to_string(),
            at: Some(0),
            memory: true,
        }
    }

    #[test]
    fn test_memory_exec_registers_new_player() {
        let reply = exec(&AppConfig::new(), &command("/add Ana, @ana, 12"))
            .unwrap()
            .unwrap();

        assert!(reply.contains("Novo jogador registrado"));
        assert!(reply.contains("🆔 ID: 1"));
        assert!(reply.contains("31/12/1969 21:00:00"));
    }

    #[test]
    fn test_exec_ignores_plain_text() {
        let reply = exec(&AppConfig::new(), &command("oi")).unwrap();
        assert!(reply.is_none());
    }

    #[test]
    fn test_initialise_is_idempotent() {
        let pool = create_memory_pool().unwrap();

        assert!(initialise(&pool, "Pessoas").unwrap());
        assert!(!initialise(&pool, "Pessoas").unwrap());

        let sheet = SqliteSheet::open(pool, "Pessoas").unwrap();
        assert_eq!(sheet.read_header().unwrap(), canonical_header());
    }

    fn initialised_sheet() -> SqliteSheet {
        let pool = create_memory_pool().unwrap();
        initialise(&pool, "Pessoas").unwrap();
        SqliteSheet::open(pool, "Pessoas").unwrap()
    }

    #[test]
    fn test_initialised_sheet_accepts_commands() {
        let sheet = initialised_sheet();
        let config = AppConfig::new();

        run_once(sheet.clone(), &config, &command("/add Ana, @ana, 12")).unwrap();
        let reply = run_once(sheet, &config, &command("/busca 1")).unwrap().unwrap();

        assert!(reply.contains("• Chicken: 12 às 31/12/1969 21:00:00"));
    }

    #[test]
    fn test_configured_match_policy_reaches_lookups() {
        let sheet = initialised_sheet();
        let mut config = AppConfig::new();
        config.store.match_policy = MatchPolicy::NameAndContact;

        run_once(sheet.clone(), &config, &command("/add Ana, @ana, 12")).unwrap();
        let reply = run_once(sheet.clone(), &config, &command("/add Ana, @outra, 20"))
            .unwrap()
            .unwrap();
        assert!(reply.contains("🆔 ID: 2"));

        config.store.match_policy = MatchPolicy::NameOrContact;
        let reply = run_once(sheet, &config, &command("/add Ana, @outra, 30"))
            .unwrap()
            .unwrap();
        assert!(reply.contains("Parabéns, Ana!"));
        assert!(reply.contains("Pontos antigos: 12.0"));
    }
}
