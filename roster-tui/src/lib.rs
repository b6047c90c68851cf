mod app;
mod events;
mod ui;

use app::App;
use color_eyre::Result;
use roster_service::{HttpUserGateway, RosterConfig, UserSession};
use std::sync::Arc;

pub async fn run(config: &RosterConfig) -> Result<()> {
    let gateway = HttpUserGateway::from_config(config)?;
    let session = UserSession::new(Arc::new(gateway), config.page_size()?);

    let terminal = ratatui::init();
    let result = App::new(session).run(terminal).await;
    ratatui::restore();
    result
}
