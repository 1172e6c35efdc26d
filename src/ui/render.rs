//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{articles, header, help, pagination, reader, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    // Header, tabs, search/summary line, body, pagination, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_title(f, app, chunks[0]);
    header::render_tabs(f, app, chunks[1]);
    header::render_search_line(f, app, chunks[2]);
    match app.view {
        View::Browse => articles::render(f, app, chunks[3]),
        View::Reader => reader::render(f, app, chunks[3]),
    }
    pagination::render(f, app, chunks[4]);
    status::render(f, app, chunks[5]);

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::tests::{sample_article, test_app};
    use crate::news::{Category, NewsError, NewsPage};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    /// Render `app` into an off-screen buffer and return its text, one
    /// string per row.
    pub(crate) fn draw(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn screen(app: &mut App) -> String {
        draw(app, 100, 30).join("\n")
    }

    fn load(app: &mut App, page: NewsPage) {
        let request = app.listing.reload();
        app.apply_fetch(request.seq, Ok(page));
    }

    fn ok_page(count: usize, total: u64) -> NewsPage {
        NewsPage {
            status: "ok".to_string(),
            articles: (0..count)
                .map(|i| sample_article(&format!("a{i}"), &format!("Story number {i}")))
                .collect(),
            total_results: total,
            message: None,
        }
    }

    #[test]
    fn test_too_small_terminal() {
        let mut app = test_app();
        let rows = draw(&mut app, 40, 8);
        assert!(rows.join("\n").contains("Terminal too small"));
    }

    #[test]
    fn test_loading_state() {
        let mut app = test_app();
        app.listing.reload();
        let text = screen(&mut app);
        assert!(text.contains("Loading articles"));
        assert!(!text.contains("Next"));
    }

    #[test]
    fn test_articles_and_pagination() {
        let mut app = test_app();
        let request = app.listing.set_category(Category::Technology);
        app.apply_fetch(request.seq, Ok(ok_page(20, 137)));
        let text = screen(&mut app);
        assert!(text.contains("Story number 0"));
        assert!(text.contains("Showing 137 articles in technology"));
        assert!(text.contains("1 2 3 4 5 … 7"));
    }

    #[test]
    fn test_single_page_hides_pagination() {
        let mut app = test_app();
        load(&mut app, ok_page(3, 3));
        let text = screen(&mut app);
        assert!(text.contains("Story number 2"));
        assert!(!text.contains("Next"));
    }

    #[test]
    fn test_empty_search_result() {
        let mut app = test_app();
        let request = app.listing.set_search_query("election");
        app.apply_fetch(request.seq, Ok(ok_page(0, 0)));
        let text = screen(&mut app);
        assert!(text.contains("No articles found"));
        assert!(text.contains("Found 0 articles for \"election\""));
        assert!(!text.contains("Next"));
    }

    #[test]
    fn test_error_state() {
        let mut app = test_app();
        let request = app.listing.reload();
        app.apply_fetch(request.seq, Err(NewsError::Timeout(Duration::from_secs(10))));
        let text = screen(&mut app);
        assert!(text.contains("Failed to fetch articles. Please try again."));
    }

    #[test]
    fn test_bookmark_marker_and_view() {
        let mut app = test_app();
        load(&mut app, ok_page(2, 2));
        app.toggle_selected_bookmark().unwrap();
        assert!(screen(&mut app).contains("★"));

        app.toggle_bookmarks_view();
        let text = screen(&mut app);
        assert!(text.contains("Bookmarks (1)"));
        assert!(!text.contains("Story number 1"));
    }

    #[test]
    fn test_reader_view() {
        let mut app = test_app();
        load(&mut app, ok_page(1, 1));
        app.enter_reader();
        let text = screen(&mut app);
        assert!(text.contains("Story number 0 body"));
        assert!(text.contains("https://example.com/a0"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = test_app();
        app.show_help = true;
        assert!(screen(&mut app).contains("Toggle bookmark"));
    }
}
