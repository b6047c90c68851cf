use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::layout;

pub fn render(app: &App, frame: &mut Frame) {
    let Some(user) = app.session.state().pending_delete() else {
        return;
    };

    let area = layout::centered_rect(50, 7, frame.area());
    let prompt = Paragraph::new(vec![
        Line::from(format!("Delete user {} ({})?", user.id, user.name)),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(": Delete   "),
            Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("/Esc: Keep"),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm Delete")
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}
