use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Telegram bot keeping the game leaderboard sheet")]
pub struct Cli {
    /// SQLite document holding the worksheets (overrides LEADERBOARD_DB_PATH)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Worksheet with the players (overrides LEADERBOARD_SHEET)
    #[arg(short, long, global = true)]
    pub sheet: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start polling Telegram for commands
    Serve,
    /// Create the worksheet with the leaderboard header
    Init,
    /// Handle a single command locally and print the reply
    Exec {
        /// Game topic the command is sent in
        #[arg(short, long)]
        game: Option<String>,
        /// Username recorded as the author of the change
        #[arg(short, long, default_value = "terminal")]
        actor: String,
        /// Send time as epoch seconds (defaults to now)
        #[arg(long)]
        at: Option<i64>,
        /// Use an empty in-memory sheet instead of the database
        #[arg(long)]
        memory: bool,
        /// Command text, e.g. "/add Ana, @ana, 120"
        text: String,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
