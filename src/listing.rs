//! Listing controller: category/search/page state driving remote fetches.
//!
//! Every state change hands back a [`FetchRequest`] for the caller to run.
//! Requests carry a sequence number; [`ListingController::apply`] only
//! accepts the result of the most recently issued request, so a slow,
//! superseded response can never overwrite fresher state.

use crate::news::{Article, Category, NewsError, NewsPage, NewsQuery, PAGE_SIZE};

/// Message shown when the relay has no upstream credential.
pub const CONFIG_ERROR_MESSAGE: &str =
    "NewsAPI key is not configured. Set NEWSAPI_KEY in the relay's environment.";

/// Message shown for every other failure.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch articles. Please try again.";

/// Fallback when upstream reports a non-ok status without a message.
const NON_OK_FALLBACK: &str = "Failed to fetch articles";

/// Maximum numbered entries in the pagination control.
const MAX_VISIBLE_PAGES: u32 = 5;

// ============================================================================
// Types
// ============================================================================

/// A fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: NewsQuery,
}

/// Why the current listing could not be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// The relay holds no upstream credential.
    Configuration,
    /// Network, timeout, or upstream HTTP failure.
    Fetch,
    /// Upstream answered with a non-ok status.
    Upstream(String),
}

impl ListingError {
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration => CONFIG_ERROR_MESSAGE,
            Self::Fetch => FETCH_ERROR_MESSAGE,
            Self::Upstream(message) => message,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration)
    }
}

/// A transient notification for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: String,
}

/// What [`ListingController::apply`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A newer request has been issued since; the result was dropped.
    Stale,
    /// Articles were stored.
    Loaded { count: usize },
    /// The fetch failed; `last_error` is set.
    Failed(Notice),
}

/// One entry in the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Which terminal outcome to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    Failed(&'a ListingError),
    Empty,
    Articles(&'a [Article]),
}

/// Current listing state. Recreated per run, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    pub category: Category,
    pub search_query: String,
    pub page: u32,
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub is_loading: bool,
    pub last_error: Option<ListingError>,
    pub showing_bookmarks: bool,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            category: Category::All,
            search_query: String::new(),
            page: 1,
            articles: Vec::new(),
            total_results: 0,
            is_loading: false,
            last_error: None,
            showing_bookmarks: false,
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Default)]
pub struct ListingController {
    state: ListingState,
    issued: u64,
}

impl ListingController {
    pub fn new(category: Category) -> Self {
        Self {
            state: ListingState {
                category,
                ..ListingState::default()
            },
            issued: 0,
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Sequence number of the most recently issued request.
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Select a category: page resets to 1 and the bookmarks view closes.
    pub fn set_category(&mut self, category: Category) -> FetchRequest {
        self.state.category = category;
        self.state.page = 1;
        self.state.showing_bookmarks = false;
        self.issue()
    }

    /// Replace the search text. Called on every keystroke.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> FetchRequest {
        self.state.search_query = query.into();
        self.state.page = 1;
        self.state.showing_bookmarks = false;
        self.issue()
    }

    /// Jump to `page`. Page numbers are 1-based; 0 is treated as 1.
    pub fn set_page(&mut self, page: u32) -> FetchRequest {
        self.state.page = page.max(1);
        self.issue()
    }

    /// Next page, if there is one.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        (self.state.page < self.total_pages()).then(|| self.set_page(self.state.page + 1))
    }

    /// Previous page, if there is one.
    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        (self.state.page > 1).then(|| self.set_page(self.state.page - 1))
    }

    /// Re-issue the current fetch unchanged (initial load and manual retry).
    pub fn reload(&mut self) -> FetchRequest {
        self.issue()
    }

    /// Flip between the listing and the saved-bookmarks view.
    pub fn toggle_bookmarks_view(&mut self) -> bool {
        self.state.showing_bookmarks = !self.state.showing_bookmarks;
        self.state.showing_bookmarks
    }

    /// The query the current state maps to.
    pub fn current_query(&self) -> NewsQuery {
        let search = self.state.search_query.trim();
        if search.is_empty() {
            NewsQuery::listing(self.state.category, self.state.page)
        } else {
            NewsQuery::search(search, self.state.category, self.state.page)
        }
    }

    fn issue(&mut self) -> FetchRequest {
        self.issued += 1;
        self.state.is_loading = true;
        self.state.last_error = None;
        let request = FetchRequest {
            seq: self.issued,
            query: self.current_query(),
        };
        tracing::debug!(
            seq = request.seq,
            category = %request.query.category,
            page = request.query.page,
            search = request.query.is_search(),
            "Issuing fetch"
        );
        request
    }

    /// Store the result of request `seq` if it is still the latest.
    pub fn apply(&mut self, seq: u64, result: Result<NewsPage, NewsError>) -> ApplyOutcome {
        if seq != self.issued {
            tracing::debug!(seq, latest = self.issued, "Discarding stale fetch result");
            return ApplyOutcome::Stale;
        }
        self.state.is_loading = false;

        match result {
            Ok(page) if page.is_ok() => {
                let count = page.articles.len();
                self.state.articles = page.articles;
                self.state.total_results = page.total_results;
                self.state.last_error = None;
                ApplyOutcome::Loaded { count }
            }
            Ok(page) => {
                let message = page
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| NON_OK_FALLBACK.to_string());
                tracing::warn!(status = %page.status, message = %message, "Upstream reported failure");
                self.fail(ListingError::Upstream(message.clone()), "Error", message)
            }
            Err(e) if e.is_configuration() => {
                tracing::error!(error = %e, "Relay is missing its API key");
                self.fail(
                    ListingError::Configuration,
                    "Configuration Error",
                    "NewsAPI key is not configured. Please check the relay's environment."
                        .to_string(),
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed");
                self.fail(ListingError::Fetch, "Error", FETCH_ERROR_MESSAGE.to_string())
            }
        }
    }

    fn fail(&mut self, error: ListingError, title: &'static str, description: String) -> ApplyOutcome {
        self.state.last_error = Some(error);
        ApplyOutcome::Failed(Notice { title, description })
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// `ceil(total_results / 20)`.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.state.total_results)
    }

    pub fn view(&self) -> ListingView<'_> {
        if self.state.is_loading {
            ListingView::Loading
        } else if let Some(error) = &self.state.last_error {
            ListingView::Failed(error)
        } else if self.state.articles.is_empty() {
            ListingView::Empty
        } else {
            ListingView::Articles(&self.state.articles)
        }
    }

    /// Pagination is shown only for a loaded multi-page listing.
    pub fn shows_pagination(&self) -> bool {
        matches!(self.view(), ListingView::Articles(_)) && self.total_pages() > 1
    }

    pub fn page_numbers(&self) -> Vec<PageItem> {
        page_numbers(self.state.page, self.total_pages())
    }

    /// One-line description of what is listed, if anything needs saying.
    pub fn summary(&self) -> Option<String> {
        let state = &self.state;
        let search = state.search_query.trim();
        if !search.is_empty() {
            let mut line = format!("Found {} articles for \"{}\"", state.total_results, search);
            if state.category != Category::All {
                line.push_str(&format!(" in {}", state.category));
            }
            Some(line)
        } else if state.category != Category::All {
            Some(format!(
                "Showing {} articles in {}",
                state.total_results, state.category
            ))
        } else {
            None
        }
    }
}

/// `ceil(total_results / PAGE_SIZE)`.
pub fn total_pages(total_results: u64) -> u32 {
    let pages = total_results.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page-number window with at most five numbered entries.
///
/// Near the start: `1 2 3 4 5 … N`; near the end: `1 … N-4 .. N`;
/// otherwise `1 … c-1 c c+1 … N`.
pub fn page_numbers(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(Page).collect();
    }

    if current <= 3 {
        let mut items: Vec<PageItem> = (1..=MAX_VISIBLE_PAGES).map(Page).collect();
        items.extend([Ellipsis, Page(total)]);
        items
    } else if current >= total - 2 {
        let mut items = vec![Page(1), Ellipsis];
        items.extend((total - MAX_VISIBLE_PAGES + 1..=total).map(Page));
        items
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total),
        ]
    }
}
