use crate::output;

use clap::Args;
use color_eyre::Result;

use roster_service::RosterConfig;

/// Print one page of users
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only users whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to show; out-of-range pages are clamped
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

pub async fn execute(args: ListArgs, config: &RosterConfig) -> Result<()> {
    let mut session = super::open_session(config).await?;

    let state = session.state_mut();
    if let Some(query) = args.search {
        state.set_query(query);
    }
    state.set_page(args.page);

    output::user_table(&session.state().view());
    Ok(())
}
