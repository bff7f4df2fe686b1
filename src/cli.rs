use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cliphaven")]
#[command(about = "Clipboard history daemon", long_about = None, version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/cliphaven/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Record clipboard history until interrupted (default)
    Run,
    /// Print the stored history, pinned entries first
    List {
        /// Show at most N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete the stored history, pinned entries included
    Clear,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
