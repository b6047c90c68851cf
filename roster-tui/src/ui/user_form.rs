use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use roster_service::Field;

use crate::app::App;
use crate::ui::{components, layout};

pub fn render(app: &App, frame: &mut Frame) {
    let chunks = layout::create_layout(frame.area());

    let Some(form) = &app.form else {
        components::render_header("User Form", frame, chunks[0]);
        let msg = Paragraph::new("No form open")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, chunks[1]);
        return;
    };

    components::render_header(&form.title(), frame, chunks[0]);

    let mut lines = Vec::new();
    for field in Field::ALL {
        let focused = field == form.focus;
        let value = form.draft.get(field);

        let label_style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let value_style = if form.errors.contains(field) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "_" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!("{:>6}:", field.label()), label_style),
            Span::raw(" "),
            Span::styled(format!("{}{}", value, cursor), value_style),
        ]));

        match form.errors.get(field) {
            Some(message) => lines.push(Line::from(Span::styled(
                format!("        {}", message),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from("")),
        }
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(body, chunks[1]);

    components::render_footer(
        "Tab/Shift-Tab: Next/Previous field | Enter: Save | Esc: Cancel",
        frame,
        chunks[2],
    );
}
