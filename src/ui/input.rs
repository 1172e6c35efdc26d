//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view and mode. Every listing change goes through
//! the controller, and the request it hands back is spawned immediately.

use crate::app::{App, AppEvent, View};
use crate::news::Category;
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_fetch;
use super::Action;

/// Lines moved by Ctrl+d / Ctrl+u and PageDown / PageUp in the reader.
const PAGE_SCROLL: usize = 10;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and view.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    // Help overlay captures all keys when visible
    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return Ok(Action::Continue);
    }

    if app.search_mode {
        handle_search_input(app, code, event_tx);
        return Ok(Action::Continue);
    }

    match app.view {
        View::Browse => handle_browse_input(app, code, event_tx),
        View::Reader => handle_reader_input(app, code, modifiers),
    }
}

/// Handle input in browse view (tabs, article list, pagination).
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let showing_bookmarks = app.listing.state().showing_bookmarks;

    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => {
            if showing_bookmarks {
                app.toggle_bookmarks_view();
            } else if !app.listing.state().search_query.is_empty() {
                app.search_input.clear();
                let request = app.listing.set_search_query("");
                spawn_fetch(app, request, event_tx);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Tab => {
            let next = app.listing.state().category.next();
            select_category(app, next, event_tx);
        }
        KeyCode::BackTab => {
            let prev = app.listing.state().category.prev();
            select_category(app, prev, event_tx);
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(&category) = Category::ALL.get(index) {
                select_category(app, category, event_tx);
            }
        }
        KeyCode::Char('n') | KeyCode::Right if !showing_bookmarks => {
            if let Some(request) = app.listing.next_page() {
                spawn_fetch(app, request, event_tx);
            }
        }
        KeyCode::Char('p') | KeyCode::Left if !showing_bookmarks => {
            if let Some(request) = app.listing.prev_page() {
                spawn_fetch(app, request, event_tx);
            }
        }
        KeyCode::Char('r') => {
            if showing_bookmarks {
                app.toggle_bookmarks_view();
            }
            let request = app.listing.reload();
            app.set_status("Reloading...");
            spawn_fetch(app, request, event_tx);
        }
        KeyCode::Char('/') => {
            if showing_bookmarks {
                app.toggle_bookmarks_view();
            }
            app.search_mode = true;
            app.search_input = app.listing.state().search_query.clone();
        }
        KeyCode::Enter => {
            app.enter_reader();
        }
        KeyCode::Char('B') => {
            if app.toggle_bookmarks_view() {
                app.set_status(format!("{} saved articles", app.bookmarks.len()));
            }
        }
        KeyCode::Char('b') => toggle_bookmark(app)?,
        KeyCode::Char('o') => open_current(app),
        KeyCode::Char('t') => toggle_theme(app)?,
        _ => {}
    }
    Ok(Action::Continue)
}

fn select_category(app: &mut App, category: Category, event_tx: &mpsc::Sender<AppEvent>) {
    let request = app.listing.set_category(category);
    app.selected_article = 0;
    spawn_fetch(app, request, event_tx);
}

/// Handle keys while typing a search.
///
/// Every edit re-issues the search; the controller's sequence numbers make
/// sure only the last keystroke's results are shown.
fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Enter => {
            app.search_mode = false;
        }
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input.clear();
            if !app.listing.state().search_query.is_empty() {
                let request = app.listing.set_search_query("");
                spawn_fetch(app, request, event_tx);
            }
        }
        KeyCode::Backspace => {
            if app.search_input.pop().is_some() {
                let request = app.listing.set_search_query(app.search_input.clone());
                spawn_fetch(app, request, event_tx);
            }
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query too long (max {} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return;
            }
            app.search_input.push(c);
            let request = app.listing.set_search_query(app.search_input.clone());
            spawn_fetch(app, request, event_tx);
        }
        _ => {}
    }
}

/// Handle input in the reader view.
fn handle_reader_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
            app.exit_reader()
        }
        KeyCode::Char('d') if ctrl => app.scroll_down(PAGE_SCROLL),
        KeyCode::Char('u') if ctrl => app.scroll_up(PAGE_SCROLL),
        KeyCode::PageDown => app.scroll_down(PAGE_SCROLL),
        KeyCode::PageUp => app.scroll_up(PAGE_SCROLL),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('b') => toggle_bookmark(app)?,
        KeyCode::Char('o') => open_current(app),
        KeyCode::Char('t') => toggle_theme(app)?,
        _ => {}
    }
    Ok(Action::Continue)
}

fn toggle_bookmark(app: &mut App) -> Result<()> {
    match app.toggle_selected_bookmark()? {
        Some(true) => app.set_status("Bookmarked"),
        Some(false) => app.set_status("Bookmark removed"),
        None => {}
    }
    Ok(())
}

fn toggle_theme(app: &mut App) -> Result<()> {
    let theme = app.toggle_theme()?;
    app.set_status(format!("Theme: {}", theme.name()));
    Ok(())
}

/// Open the current article's canonical URL in the system browser.
fn open_current(app: &mut App) {
    let Some(url) = app.current_article().map(|a| a.url.clone()) else {
        return;
    };
    if url.is_empty() {
        app.set_status("Article has no URL");
        return;
    }
    // Validate before handing the URL to the OS opener
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(valid) => match open::that(valid.as_str()) {
            Ok(()) => app.set_status("Opening in browser..."),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{sample_article, test_app};
    use crate::news::NewsPage;
    use crate::theme::Theme;

    fn channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        mpsc::channel(32)
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    fn load(app: &mut App, count: usize, total: u64) {
        let request = app.listing.reload();
        let page = NewsPage {
            status: "ok".to_string(),
            articles: (0..count)
                .map(|i| sample_article(&format!("a{i}"), &format!("Story {i}")))
                .collect(),
            total_results: total,
            message: None,
        };
        app.apply_fetch(request.seq, Ok(page));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
        let ctrl_c = handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx).unwrap();
        assert!(matches!(ctrl_c, Action::Quit));
    }

    #[tokio::test]
    async fn test_tab_cycles_category_and_resets_page() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        load(&mut app, 20, 137);
        press(&mut app, KeyCode::Char('n'), &tx);
        assert_eq!(app.listing.state().page, 2);

        let before = app.listing.latest_seq();
        press(&mut app, KeyCode::Tab, &tx);
        assert_eq!(app.listing.state().category, Category::Technology);
        assert_eq!(app.listing.state().page, 1);
        assert_eq!(app.listing.latest_seq(), before + 1);

        press(&mut app, KeyCode::BackTab, &tx);
        assert_eq!(app.listing.state().category, Category::All);
    }

    #[tokio::test]
    async fn test_number_keys_select_category() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        press(&mut app, KeyCode::Char('6'), &tx);
        assert_eq!(app.listing.state().category, Category::Science);
        let seq = app.listing.latest_seq();
        press(&mut app, KeyCode::Char('9'), &tx);
        assert_eq!(app.listing.latest_seq(), seq);
    }

    #[tokio::test]
    async fn test_paging_respects_bounds() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        load(&mut app, 20, 40);
        let seq = app.listing.latest_seq();

        press(&mut app, KeyCode::Left, &tx);
        assert_eq!(app.listing.latest_seq(), seq);

        press(&mut app, KeyCode::Right, &tx);
        assert_eq!(app.listing.state().page, 2);

        load(&mut app, 20, 40);
        let seq = app.listing.latest_seq();
        press(&mut app, KeyCode::Right, &tx);
        assert_eq!(app.listing.latest_seq(), seq);
        assert_eq!(app.listing.state().page, 2);
    }

    #[tokio::test]
    async fn test_each_keystroke_reissues_search() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'), &tx);
        assert!(app.search_mode);

        let start = app.listing.latest_seq();
        for c in "mars".chars() {
            press(&mut app, KeyCode::Char(c), &tx);
        }
        assert_eq!(app.listing.latest_seq(), start + 4);
        assert_eq!(app.listing.state().search_query, "mars");
        assert_eq!(app.listing.current_query().search.as_deref(), Some("mars"));

        press(&mut app, KeyCode::Backspace, &tx);
        assert_eq!(app.listing.state().search_query, "mar");

        press(&mut app, KeyCode::Enter, &tx);
        assert!(!app.search_mode);
        assert_eq!(app.listing.state().search_query, "mar");
    }

    #[tokio::test]
    async fn test_escape_clears_search() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'), &tx);
        press(&mut app, KeyCode::Char('x'), &tx);
        press(&mut app, KeyCode::Esc, &tx);
        assert!(!app.search_mode);
        assert!(app.search_input.is_empty());
        assert!(app.listing.state().search_query.is_empty());
        assert!(!app.listing.current_query().is_search());
    }

    #[tokio::test]
    async fn test_bookmark_and_bookmarks_view() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        load(&mut app, 3, 3);

        press(&mut app, KeyCode::Char('j'), &tx);
        press(&mut app, KeyCode::Char('b'), &tx);
        assert!(app.bookmarks.contains("a1"));

        press(&mut app, KeyCode::Char('B'), &tx);
        assert!(app.listing.state().showing_bookmarks);
        assert_eq!(app.visible_articles().len(), 1);

        press(&mut app, KeyCode::Esc, &tx);
        assert!(!app.listing.state().showing_bookmarks);
    }

    #[tokio::test]
    async fn test_reader_navigation() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        load(&mut app, 2, 2);

        press(&mut app, KeyCode::Enter, &tx);
        assert_eq!(app.view, View::Reader);
        press(&mut app, KeyCode::Char('j'), &tx);
        assert_eq!(app.scroll_offset, 1);

        press(&mut app, KeyCode::Char('b'), &tx);
        assert!(app.bookmarks.contains("a0"));

        press(&mut app, KeyCode::Esc, &tx);
        assert_eq!(app.view, View::Browse);
    }

    #[tokio::test]
    async fn test_theme_toggle_key() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        press(&mut app, KeyCode::Char('t'), &tx);
        assert_eq!(app.theme(), Theme::Dark);
        assert_eq!(app.status_message.as_ref().unwrap().text, "Theme: Dark");
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let (tx, _rx) = channel();
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);

        // 'q' closes help instead of quitting
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        assert!(!app.show_help);
    }
}
