use crate::output;

use clap::Args;
use color_eyre::eyre::{bail, Result};

use roster_service::{Field, RosterConfig};

/// Edit a user; fields not given keep their current value
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the user to edit
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

impl EditArgs {
    fn changes(&self) -> impl Iterator<Item = (Field, &String)> {
        [
            (Field::Name, self.name.as_ref()),
            (Field::Email, self.email.as_ref()),
            (Field::Phone, self.phone.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
    }
}

pub async fn execute(args: EditArgs, config: &RosterConfig) -> Result<()> {
    if args.changes().next().is_none() {
        bail!("Nothing to change; pass --name, --email or --phone");
    }

    let mut session = super::open_session(config).await?;
    let Some(current) = session.state().users().get(args.id) else {
        bail!("User {} not found", args.id);
    };

    let mut draft = current.to_new_user();
    for (field, value) in args.changes() {
        *draft.get_mut(field) = value.clone();
    }
    super::check_fields(&draft)?;

    output::status("Updating", &format!("user {}", args.id));
    let result = session.update(draft.with_id(args.id)).await;
    super::settle(&session, result)?;

    if let Some(user) = session.state().users().get(args.id) {
        println!("{}", output::user_row(user));
    }
    Ok(())
}
