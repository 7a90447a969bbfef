use std::path::PathBuf;

use clap::Parser;

/// Build invoices in the terminal and keep a history of saved ones.
#[derive(Debug, Parser)]
#[command(name = "invoice-workspace", version, about)]
pub struct Cli {
    /// SQLite URL of the history database (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Where to write logs (overrides LOG_FILE)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Keep the history in memory only; nothing is written to disk
    #[arg(long)]
    pub ephemeral: bool,
}
