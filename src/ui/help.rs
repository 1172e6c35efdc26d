//! Help overlay: keybinding table grouped by context.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

/// (section, [(keys, description)]) in display order.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "General",
        &[
            ("?", "Toggle this help"),
            ("t", "Toggle light/dark theme"),
            ("q / Ctrl+c", "Quit"),
        ],
    ),
    (
        "Articles",
        &[
            ("j / k", "Move selection"),
            ("Tab / Shift+Tab", "Next / previous category"),
            ("1-7", "Jump to category"),
            ("n / p", "Next / previous page"),
            ("Enter", "Read article"),
            ("b", "Toggle bookmark"),
            ("B", "Show bookmarks"),
            ("o", "Open in browser"),
            ("r", "Reload"),
            ("Esc", "Clear search / leave bookmarks"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Start typing a search"),
            ("Enter", "Keep results"),
            ("Esc", "Clear search"),
        ],
    ),
    (
        "Reader",
        &[
            ("j / k", "Scroll"),
            ("Ctrl+d / Ctrl+u", "Scroll a page"),
            ("Esc", "Back to list"),
        ],
    ),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (i, (label, bindings)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.palette.reader_heading),
        );
        for (keys, description) in bindings.iter() {
            rows.push(Row::new(vec![format!("  {}", keys), description.to_string()]));
        }
    }

    let widths = [Constraint::Length(20), Constraint::Min(20)];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border_focused)
                .title(" Help (? to close) "),
        )
        .style(app.palette.reader_body);

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
