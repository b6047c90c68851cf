use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use roster_service::PageWindow;

pub fn render_header(title: &str, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

pub fn render_footer(text: &str, frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(footer, area);
}

/// Error banner if there is one, otherwise the success notice
pub fn render_banner(error: Option<&str>, notice: Option<&str>, frame: &mut Frame, area: Rect) {
    let (text, color, title) = match (error, notice) {
        (Some(error), _) => (error, Color::Red, "Error (x to dismiss)"),
        (None, Some(notice)) => (notice, Color::Green, "Done (x to dismiss)"),
        (None, None) => return,
    };

    let banner = Paragraph::new(Line::from(vec![
        Span::styled(
            if color == Color::Red { "✗ " } else { "✓ " },
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(text, Style::default().fg(color)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(color)),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(banner, area);
}

/// Previous / 1 2 3 / Next bar
pub fn render_pagination(window: PageWindow, frame: &mut Frame, area: Rect) {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        "◀ Previous ",
        if window.has_previous() { enabled } else { disabled },
    )];

    for page in window.page_numbers() {
        let style = if page == window.current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            enabled
        };
        spans.push(Span::styled(format!(" {} ", page), style));
    }

    spans.push(Span::styled(
        " Next ▶",
        if window.has_next() { enabled } else { disabled },
    ));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Page {}/{}", window.current, window.total)),
    );
    frame.render_widget(bar, area);
}
