use crate::listing::{ApplyOutcome, ListingController, ListingView, Notice};
use crate::news::{Article, NewsClient, NewsError, NewsPage};
use crate::storage::{BookmarkStore, StorageError, ThemeStore};
use crate::theme::{ColorPalette, Theme};
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 4;

// ============================================================================
// View and Event Types
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse, // Category tabs, article list, pagination
    Reader, // Full-screen single article
}

/// Transient status-bar message.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: Cow<'static, str>,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Events from background tasks
pub enum AppEvent {
    /// A listing fetch finished.
    ///
    /// `seq` is the sequence number the controller issued for the request;
    /// results for superseded requests are dropped on arrival.
    ArticlesLoaded {
        seq: u64,
        result: Result<NewsPage, NewsError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub client: NewsClient,
    pub listing: ListingController,
    pub bookmarks: BookmarkStore,
    pub themes: ThemeStore,
    /// Styles for the active theme. Rebuilt on toggle.
    pub palette: ColorPalette,

    // UI State
    pub view: View,
    pub selected_article: usize,
    pub scroll_offset: usize,
    pub reader_article: Option<Article>,

    // Search
    pub search_mode: bool,
    pub search_input: String,

    pub status_message: Option<StatusMessage>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,

    /// Last known reader viewport height, excluding borders.
    pub reader_visible_lines: usize,
}

impl App {
    pub fn new(
        client: NewsClient,
        listing: ListingController,
        bookmarks: BookmarkStore,
        themes: ThemeStore,
    ) -> Self {
        let palette = themes.get().palette();
        let search_input = listing.state().search_query.clone();
        Self {
            client,
            listing,
            bookmarks,
            themes,
            palette,
            view: View::Browse,
            selected_article: 0,
            scroll_offset: 0,
            reader_article: None,
            search_mode: false,
            search_input,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            reader_visible_lines: 0,
        }
    }

    pub fn theme(&self) -> Theme {
        self.themes.get()
    }

    /// Flip light/dark, persist it, and rebuild the palette.
    pub fn toggle_theme(&mut self) -> Result<Theme, StorageError> {
        let theme = self.themes.toggle()?;
        self.palette = theme.palette();
        self.needs_redraw = true;
        Ok(theme)
    }

    // ========================================================================
    // Article list
    // ========================================================================

    /// Articles in the list pane: saved bookmarks or the fetched page.
    pub fn visible_articles(&self) -> &[Article] {
        if self.listing.state().showing_bookmarks {
            self.bookmarks.list()
        } else {
            match self.listing.view() {
                ListingView::Articles(articles) => articles,
                _ => &[],
            }
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.selected_article)
    }

    pub fn is_bookmarked(&self, article: &Article) -> bool {
        self.bookmarks.contains(&article.id)
    }

    /// Navigate up in the article list
    pub fn nav_up(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    /// Navigate down in the article list
    pub fn nav_down(&mut self) {
        let len = self.visible_articles().len();
        if len > 0 {
            self.selected_article = self.selected_article.saturating_add(1).min(len - 1);
        }
    }

    /// Keep the selection inside the current list.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_articles().len();
        if self.selected_article >= len {
            self.selected_article = len.saturating_sub(1);
        }
    }

    /// Bookmark or un-bookmark the article under the cursor.
    ///
    /// Returns `None` when nothing is selected, otherwise whether the
    /// article is bookmarked afterwards.
    pub fn toggle_selected_bookmark(&mut self) -> Result<Option<bool>, StorageError> {
        let Some(article) = self.current_article().cloned() else {
            return Ok(None);
        };
        let saved = self.bookmarks.toggle(&article)?;
        self.clamp_selection();
        Ok(Some(saved))
    }

    /// Article the bookmark and open actions apply to: the one in the
    /// reader if it is open, otherwise the selection.
    pub fn current_article(&self) -> Option<&Article> {
        match self.view {
            View::Reader => self.reader_article.as_ref(),
            View::Browse => self.selected_article(),
        }
    }

    /// Show saved bookmarks instead of the fetched page, or switch back.
    pub fn toggle_bookmarks_view(&mut self) -> bool {
        let showing = self.listing.toggle_bookmarks_view();
        self.selected_article = 0;
        showing
    }

    // ========================================================================
    // Fetch results
    // ========================================================================

    /// Hand a finished fetch to the controller and react to the outcome.
    pub fn apply_fetch(&mut self, seq: u64, result: Result<NewsPage, NewsError>) -> ApplyOutcome {
        let outcome = self.listing.apply(seq, result);
        match &outcome {
            ApplyOutcome::Stale => {}
            ApplyOutcome::Loaded { count } => {
                tracing::debug!(seq, count, "Listing updated");
                if !self.listing.state().showing_bookmarks {
                    self.selected_article = 0;
                }
            }
            ApplyOutcome::Failed(notice) => self.set_notice(notice),
        }
        outcome
    }

    // ========================================================================
    // Reader
    // ========================================================================

    /// Open the selected article in the reader.
    pub fn enter_reader(&mut self) -> Option<&Article> {
        let article = self.selected_article()?.clone();
        self.view = View::Reader;
        self.scroll_offset = 0;
        self.reader_article = Some(article);
        self.reader_article.as_ref()
    }

    /// Exit reader view back to browse
    pub fn exit_reader(&mut self) {
        self.view = View::Browse;
        self.scroll_offset = 0;
        self.reader_article = None;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(MAX_SCROLL);
    }

    /// Clamp scroll offset so the last line stays in view.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set status message (will auto-expire)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some(StatusMessage {
            text: msg.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    /// Show a failure notification.
    pub fn set_notice(&mut self, notice: &Notice) {
        self.status_message = Some(StatusMessage {
            text: Cow::Owned(format!("{}: {}", notice.title, notice.description)),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some(status) = &self.status_message {
            if status.shown_at.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
