use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

/// Standard 3-section layout: header, main, footer
pub fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

/// List layout: header, banner, search, table, pagination, footer
pub fn create_list_layout(area: Rect, show_banner: bool, show_pages: bool) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(if show_banner { 3 } else { 0 }), // Error / notice
            Constraint::Length(3), // Search
            Constraint::Min(5),    // Table
            Constraint::Length(if show_pages { 3 } else { 0 }), // Pagination
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

/// A box of fixed size centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
