use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, AppState};

pub trait EventHandler {
    fn handle_events(&mut self) -> Result<()>;
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()>;
}

impl EventHandler for App {
    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    self.handle_key_event(key_event)?
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.quit();
            return Ok(());
        }

        match self.state {
            AppState::Loading => {
                if let KeyCode::Char('q') | KeyCode::Esc = key_event.code {
                    self.quit();
                }
            }
            AppState::UserList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.quit(),
                KeyCode::Up | KeyCode::Char('k') => self.move_up(),
                KeyCode::Down | KeyCode::Char('j') => self.move_down(),
                KeyCode::Left | KeyCode::Char('h') => self.previous_page(),
                KeyCode::Right | KeyCode::Char('l') => self.next_page(),
                KeyCode::Char('/') => self.start_search(),
                KeyCode::Char('a') => self.open_add_form(),
                KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
                KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
                KeyCode::Char('x') => self.dismiss_banners(),
                _ => {}
            },
            AppState::Search => match key_event.code {
                KeyCode::Enter | KeyCode::Esc => self.finish_search(),
                KeyCode::Backspace => self.search_pop_char(),
                KeyCode::Char(c) => self.search_push_char(c),
                _ => {}
            },
            AppState::UserForm => match key_event.code {
                KeyCode::Esc => self.cancel_form(),
                KeyCode::Enter => self.submit_form(),
                KeyCode::Tab | KeyCode::Down => self.form_next_field(),
                KeyCode::BackTab | KeyCode::Up => self.form_previous_field(),
                KeyCode::Backspace => self.form_pop_char(),
                KeyCode::Char(c) => self.form_push_char(c),
                _ => {}
            },
            AppState::ConfirmDelete => match key_event.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.resolve_delete(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.resolve_delete(false)
                }
                _ => {}
            },
        }
        Ok(())
    }
}
