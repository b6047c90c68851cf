use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use roster_service::SessionView;

use crate::app::{App, AppState};
use crate::ui::{components, layout};

pub fn render(app: &App, frame: &mut Frame) {
    let view = app.session.state().view();
    let show_banner = view.error.is_some() || view.notice.is_some();
    let window = view.page_window();

    let chunks = layout::create_list_layout(frame.area(), show_banner, window.is_needed());

    components::render_header("Roster User Manager", frame, chunks[0]);
    components::render_banner(view.error, view.notice, frame, chunks[1]);
    render_search(app, &view, frame, chunks[2]);
    render_table(app, &view, frame, chunks[3]);
    if window.is_needed() {
        components::render_pagination(window, frame, chunks[4]);
    }

    let footer = if app.state == AppState::Search {
        "Type to search | Backspace: Delete | Enter/Esc: Done"
    } else {
        "j/k: Select | h/l: Page | /: Search | a: Add | e: Edit | d: Delete | x: Dismiss | q: Quit"
    };
    components::render_footer(footer, frame, chunks[5]);
}

fn render_search(app: &App, view: &SessionView, frame: &mut Frame, area: Rect) {
    let active = app.state == AppState::Search;
    let text = if active {
        format!("{}_", view.query)
    } else if view.query.is_empty() {
        "Press / to search users by name".to_string()
    } else {
        view.query.to_string()
    };

    let style = if !active && view.query.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(if active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Cyan)
            }),
    );
    frame.render_widget(search, area);
}

fn render_table(app: &App, view: &SessionView, frame: &mut Frame, area: Rect) {
    let mut title = format!("Users ({})", view.filtered_count);
    if view.busy {
        title.push_str(" - saving...");
    }
    let block = Block::default().borders(Borders::ALL).title(title);

    if view.users.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No users found.",
            Style::default().fg(Color::Yellow),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["ID", "Name", "Email", "Phone"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(user.id.to_string()),
                Cell::from(user.name.as_str()),
                Cell::from(user.email.as_str()),
                Cell::from(user.phone.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
        Constraint::Percentage(30),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
