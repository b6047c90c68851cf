use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::{components, layout};

pub fn render(frame: &mut Frame) {
    let chunks = layout::create_layout(frame.area());

    components::render_header("Roster User Manager", frame, chunks[0]);
    let msg = Paragraph::new("Loading users...")
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Users"));
    frame.render_widget(msg, chunks[1]);
    components::render_footer("q: Quit", frame, chunks[2]);
}
