use crate::output;

use clap::Args;
use color_eyre::Result;

use roster_service::{NewUser, RosterConfig};

/// Add a user
#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,
}

pub async fn execute(args: AddArgs, config: &RosterConfig) -> Result<()> {
    let candidate = NewUser::new(args.name, args.email, args.phone);
    super::check_fields(&candidate)?;

    let mut session = super::open_session(config).await?;
    output::status("Adding", &candidate.name);

    let result = session.create(candidate).await;
    let id = super::settle(&session, result)?;

    if let Some(user) = session.state().users().get(id) {
        println!("{}", output::user_row(user));
    }
    Ok(())
}
