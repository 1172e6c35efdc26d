use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of articles requested per page. Fixed for the whole application.
pub const PAGE_SIZE: u32 = 20;

/// Substring that identifies a missing-credential failure coming back from the relay.
///
/// The relay embeds it in its 500 body; the listing controller looks for it to
/// swap the generic failure message for setup instructions.
pub const CONFIG_ERROR_MARKER: &str = "API key is not configured";

// ============================================================================
// Category
// ============================================================================

/// The fixed set of headline categories the reader offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Technology,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::Technology,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
    ];

    /// Wire name used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Technology => "technology",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
        }
    }

    /// Human-readable label for the category tabs.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Technology => "Technology",
            Self::Business => "Business",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Sports => "Sports",
        }
    }

    /// Value sent upstream, or `None` for `all` (the parameter is omitted).
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.as_str()),
        }
    }

    /// Tag stamped on articles fetched under this category.
    pub fn article_tag(self) -> &'static str {
        match self {
            Self::All => "general",
            other => other.as_str(),
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next category in display order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category in display order, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Article
// ============================================================================

/// A normalized article as the reader uses and bookmarks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    /// RFC 3339 timestamp as reported upstream.
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
}

impl Article {
    /// Published time as a Unix timestamp, if the upstream value parses.
    pub fn published_timestamp(&self) -> Option<i64> {
        chrono::DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.timestamp())
    }
}

/// Derive a stable article id from its canonical URL.
///
/// Upstream articles carry no identifier. Hashing the URL keeps the id stable
/// across pages and sessions so bookmarks can be matched against fresh fetches.
/// Articles without a URL fall back to title + publish time.
pub fn derive_article_id(url: &str, title: &str, published_at: &str) -> String {
    let mut hasher = Sha256::new();
    if url.is_empty() {
        hasher.update(title.as_bytes());
        hasher.update(b"\n");
        hasher.update(published_at.as_bytes());
    } else {
        hasher.update(url.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

// ============================================================================
// Queries and pages
// ============================================================================

/// What the listing controller wants fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// Search text; `None` means a plain category listing.
    pub search: Option<String>,
    pub category: Category,
    pub page: u32,
    pub page_size: u32,
}

impl NewsQuery {
    pub fn listing(category: Category, page: u32) -> Self {
        Self {
            search: None,
            category,
            page,
            page_size: PAGE_SIZE,
        }
    }

    pub fn search(query: impl Into<String>, category: Category, page: u32) -> Self {
        Self {
            search: Some(query.into()),
            category,
            page,
            page_size: PAGE_SIZE,
        }
    }

    pub fn is_search(&self) -> bool {
        self.search.is_some()
    }
}

/// One page of results as returned through the relay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewsPage {
    /// `"ok"` or `"error"`, as reported upstream.
    pub status: String,
    pub articles: Vec<Article>,
    pub total_results: u64,
    /// Upstream message accompanying a non-ok status.
    pub message: Option<String>,
}

impl NewsPage {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// ============================================================================
// Upstream wire format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireResponse {
    // Upstream may send null for any of these
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub articles: Option<Vec<WireArticle>>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireArticle {
    #[serde(default)]
    pub source: WireSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireSource {
    pub name: Option<String>,
}

/// Error body shapes produced by the relay and upstream.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireError {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl WireError {
    /// Most specific human-readable text available.
    pub(crate) fn text(&self) -> Option<String> {
        match (&self.error, &self.message) {
            (Some(e), Some(m)) if e != m => Some(format!("{}: {}", e, m)),
            (Some(e), _) => Some(e.clone()),
            (None, Some(m)) => Some(m.clone()),
            (None, None) => None,
        }
    }
}
