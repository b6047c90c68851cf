pub mod components;
pub mod confirm;
pub mod layout;
pub mod loading;
pub mod user_form;
pub mod user_list;

use ratatui::Frame;

use crate::app::{App, AppState};

pub fn render(app: &App, frame: &mut Frame) {
    match app.state {
        AppState::Loading => loading::render(frame),
        AppState::UserList | AppState::Search => user_list::render(app, frame),
        AppState::UserForm => user_form::render(app, frame),
        AppState::ConfirmDelete => {
            user_list::render(app, frame);
            confirm::render(app, frame);
        }
    }
}
