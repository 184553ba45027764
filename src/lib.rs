pub mod cli;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod parser;
pub mod reconciler;
pub mod services;
pub mod store;
pub mod telegram;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::info;

use crate::config::settings::AppConfig;
use crate::services::local::{self, LocalCommand};
use crate::services::BotService;

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Environment configuration with the command line store flags applied
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let config = AppConfig::from_env()?;
    Ok(config.with_store_overrides(cli.database.clone(), cli.sheet.clone()))
}

pub fn handle_serve(config: &AppConfig) -> Result<()> {
    let sheet = local::open_sheet(&config.store)?;
    let dispatcher = local::build_dispatcher(sheet, config)?;
    info!(
        "Serving sheet '{}' from {}",
        config.store.sheet_name, config.store.database_path
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut service = BotService::new(dispatcher, &config.telegram)?;
        service.run().await
    })
}

pub fn handle_init(config: &AppConfig) -> Result<bool> {
    local::init(&config.store)
}

pub fn handle_exec(config: &AppConfig, command: &LocalCommand) -> Result<Option<String>> {
    local::exec(config, command)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
