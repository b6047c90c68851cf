pub mod add;
pub mod edit;
pub mod list;
pub mod remove;

use std::sync::Arc;

use color_eyre::eyre::{eyre, Report, Result};
use tracing::debug;

use roster_service::{
    validate, HttpUserGateway, NewUser, RosterConfig, SessionResult, UserSession,
};

use crate::output;

/// Fetch the user list into a fresh session
pub async fn open_session(config: &RosterConfig) -> Result<UserSession> {
    let gateway = HttpUserGateway::from_config(config)?;
    let mut session = UserSession::new(Arc::new(gateway), config.page_size()?);

    output::status("Loading", &format!("users from {}", config.api_root));
    let result = session.load().await;
    settle(&session, result)?;
    Ok(session)
}

/// Report the session's banner for a finished operation and turn failures
/// into an error carrying that banner.
pub fn settle<T>(session: &UserSession, result: SessionResult<T>) -> Result<T> {
    match result {
        Ok(value) => {
            if let Some(notice) = session.state().notice() {
                output::success(notice);
            }
            Ok(value)
        }
        Err(e) => {
            debug!(error = %e, "operation failed");
            match session.state().error() {
                Some(banner) => {
                    let banner = banner.to_string();
                    Err(Report::new(e).wrap_err(banner))
                }
                None => Err(Report::new(e)),
            }
        }
    }
}

/// Print every field error and fail if there were any
pub fn check_fields(candidate: &NewUser) -> Result<()> {
    let errors = validate(candidate);
    if errors.is_empty() {
        return Ok(());
    }
    for (field, message) in errors.iter() {
        output::failure(&format!("{}: {}", field.label(), message));
    }
    Err(eyre!("{} invalid field(s)", errors.len()))
}
