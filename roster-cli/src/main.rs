mod commands;
mod logging;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;

use roster_service::RosterConfig;

use commands::{add::AddArgs, edit::EditArgs, list::ListArgs, remove::RemoveArgs};

/// Browse and edit users on a REST API
#[derive(Parser, Debug)]
#[command(name = "roster", version, about)]
struct Cli {
    /// Config file (default: ~/.roster/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive user manager (default)
    Tui,

    /// Print one page of users
    List(ListArgs),

    /// Add a user
    Add(AddArgs),

    /// Edit a user
    Edit(EditArgs),

    /// Delete a user
    Remove(RemoveArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = RosterConfig::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Command::Tui);
    // stderr would draw over the terminal UI
    let to_stderr = cli.verbose && !matches!(command, Command::Tui);
    let _guard = logging::init_logging(&config.log, to_stderr)?;

    match command {
        Command::Tui => roster_tui::run(&config).await,
        Command::List(args) => commands::list::execute(args, &config).await,
        Command::Add(args) => commands::add::execute(args, &config).await,
        Command::Edit(args) => commands::edit::execute(args, &config).await,
        Command::Remove(args) => commands::remove::execute(args, &config).await,
    }
}
