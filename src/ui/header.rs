//! Header rows: title bar, category tabs, and the search/summary line.

use crate::app::App;
use crate::news::Category;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

pub(super) fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let right = format!(
        "{} theme  {} saved ",
        app.theme().name(),
        app.bookmarks.len()
    );
    let left = " newsdesk ";
    let gap = (area.width as usize).saturating_sub(left.len() + right.chars().count());

    let line = Line::from(vec![
        Span::styled(left, palette.header_title),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, palette.summary),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub(super) fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let state = app.listing.state();
    let selected = Category::ALL
        .iter()
        .position(|c| *c == state.category)
        .unwrap_or(0);

    // No tab is highlighted while the bookmarks view is open
    let highlight = if state.showing_bookmarks {
        palette.tab_normal
    } else {
        palette.tab_selected
    };

    let tabs = Tabs::new(Category::ALL.iter().map(|c| c.label()))
        .select(selected)
        .style(palette.tab_normal)
        .highlight_style(highlight)
        .divider("|");
    f.render_widget(tabs, area);
}

/// Search box while typing; otherwise the active query or the listing summary.
pub(super) fn render_search_line(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let state = app.listing.state();

    let line = if app.search_mode {
        Line::from(vec![
            Span::styled(" Search: ", palette.search_input),
            Span::raw(format!("{}_", app.search_input)),
        ])
    } else if state.showing_bookmarks {
        Line::from(Span::styled(
            format!(" Bookmarks ({})", app.bookmarks.len()),
            palette.summary,
        ))
    } else if let Some(summary) = app.listing.summary() {
        Line::from(Span::styled(format!(" {}", summary), palette.summary))
    } else {
        Line::from(Span::styled(" Press / to search", palette.summary))
    };
    f.render_widget(Paragraph::new(line), area);
}
