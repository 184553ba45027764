use anyhow::Result;
use colored::Colorize;

use leaderboard_bot::cli::{Cli, Command};
use leaderboard_bot::config::settings::AppConfig;
use leaderboard_bot::services::LocalCommand;
use leaderboard_bot::{
    handle_completions, handle_exec, handle_init, handle_serve, interpret, load_config,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Completions { shell } => handle_completions(*shell),
        Command::Serve => handle_serve(&load_config(cli)?),
        Command::Init => run_init(&load_config(cli)?),
        Command::Exec {
            game,
            actor,
            at,
            memory,
            text,
        } => {
            let command = LocalCommand {
                text: text.clone(),
                game: game.clone(),
                actor: actor.clone(),
                at: *at,
                memory: *memory,
            };
            run_exec(&load_config(cli)?, &command)
        }
    }
}

fn run_init(config: &AppConfig) -> Result<()> {
    let sheet = &config.store.sheet_name;
    if handle_init(config)? {
        println!("{} worksheet '{sheet}'", "Created".green().bold());
    } else {
        println!("{} worksheet '{sheet}' already exists", "Kept".yellow().bold());
    }
    Ok(())
}

fn run_exec(config: &AppConfig, command: &LocalCommand) -> Result<()> {
    match handle_exec(config, command)? {
        Some(reply) => println!("{}", reply.cyan()),
        None => println!("{}", "(not a command, no reply)".dimmed()),
    }
    Ok(())
}
