use crate::output;

use std::io::{self, BufRead, Write};

use clap::Args;
use color_eyre::Result;

use roster_service::{RosterConfig, UserRecord};

/// Delete a user
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Id of the user to delete
    pub id: u64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn execute(args: RemoveArgs, config: &RosterConfig) -> Result<()> {
    let mut session = super::open_session(config).await?;

    let assume_yes = args.yes;
    let result = session
        .delete(args.id, |user| assume_yes || prompt(user))
        .await;

    match super::settle(&session, result)? {
        Some(id) => output::dim(&format!("  Removed user {}", id)),
        None => output::info("Delete cancelled"),
    }
    Ok(())
}

fn prompt(user: &UserRecord) -> bool {
    eprint!("Delete user {} ({})? [y/N] ", user.id, user.name);
    let _ = io::stderr().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
