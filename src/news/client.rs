use super::types::{
    derive_article_id, Article, Category, NewsPage, NewsQuery, WireArticle, WireError,
    WireResponse,
};
use crate::util::{clean_text, read_limited_body, BodyError, MAX_BODY_SIZE};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default request timeout. Requests are never retried.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),
}

impl From<BodyError> for NewsError {
    fn from(err: BodyError) -> Self {
        match err {
            BodyError::TooLarge(limit) => NewsError::ResponseTooLarge(limit),
            BodyError::Transport(e) => NewsError::Network(e),
        }
    }
}

impl NewsError {
    /// True when the relay reported that it holds no upstream credential.
    pub fn is_configuration(&self) -> bool {
        self.to_string().contains(super::CONFIG_ERROR_MARKER)
    }
}

/// Client for the same-origin news relay.
///
/// Never talks to the upstream API directly: the relay owns the credential.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl NewsClient {
    /// Create a client for the relay at `endpoint` (e.g. `http://127.0.0.1:8787/api/news`).
    pub fn new(endpoint: &str) -> Result<Self, NewsError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| NewsError::InvalidUrl(format!("{endpoint}: {e}")))?;
        match endpoint.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(NewsError::InvalidUrl(format!(
                    "unsupported scheme {scheme} (only http/https allowed)"
                )))
            }
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Categories offered by the reader. Upstream has no categories endpoint.
    pub fn categories() -> &'static [Category] {
        &Category::ALL
    }

    /// Fetch a page of top headlines, optionally narrowed to a category.
    pub async fn list_by_category(
        &self,
        category: Category,
        page: u32,
        page_size: u32,
    ) -> Result<NewsPage, NewsError> {
        self.fetch(&NewsQuery {
            search: None,
            category,
            page,
            page_size,
        })
        .await
    }

    /// Search headlines for `query`, optionally narrowed to a category.
    pub async fn search_by_category(
        &self,
        query: &str,
        category: Category,
        page: u32,
        page_size: u32,
    ) -> Result<NewsPage, NewsError> {
        self.fetch(&NewsQuery {
            search: Some(query.to_string()),
            category,
            page,
            page_size,
        })
        .await
    }

    /// Issue the request described by `query`.
    pub async fn fetch(&self, query: &NewsQuery) -> Result<NewsPage, NewsError> {
        let url = self.request_url(query);
        tracing::debug!(
            url = %url,
            search = query.is_search(),
            category = %query.category,
            page = query.page,
            "Fetching headlines"
        );

        // One deadline covers connect, headers and the full body
        let (status, body) = tokio::time::timeout(self.timeout, async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            let body = read_limited_body(response, MAX_BODY_SIZE).await?;
            Ok::<_, NewsError>((status, body))
        })
        .await
        .map_err(|_| NewsError::Timeout(self.timeout))??;

        if !status.is_success() {
            let message = serde_json::from_slice::<WireError>(&body)
                .ok()
                .and_then(|e| e.text())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            tracing::warn!(status = status.as_u16(), message = %message, "Relay returned an error");
            return Err(NewsError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let wire: WireResponse = serde_json::from_slice(&body)?;
        let page = normalize(wire, query.category);
        tracing::debug!(
            articles = page.articles.len(),
            total = page.total_results,
            "Fetched headlines"
        );
        Ok(page)
    }

    /// Build the relay URL for a query. `category` is omitted for `all`.
    pub fn request_url(&self, query: &NewsQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(q) = &query.search {
                pairs.append_pair("q", q);
            }
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("pageSize", &query.page_size.to_string());
            if let Some(category) = query.category.query_value() {
                pairs.append_pair("category", category);
            }
        }
        url
    }
}

fn normalize(wire: WireResponse, category: Category) -> NewsPage {
    NewsPage {
        status: wire.status.unwrap_or_default(),
        articles: wire
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(|a| normalize_article(a, category))
            .collect(),
        total_results: wire.total_results.unwrap_or_default(),
        message: wire.message,
    }
}

fn normalize_article(wire: WireArticle, category: Category) -> Article {
    let clean = |s: Option<String>| s.map(|s| clean_text(&s)).unwrap_or_default();

    let url = wire.url.unwrap_or_default();
    let title = clean(wire.title);
    let published_at = wire.published_at.unwrap_or_default();

    Article {
        id: derive_article_id(&url, &title, &published_at),
        title,
        description: clean(wire.description),
        content: clean(wire.content),
        author: wire
            .author
            .map(|a| clean_text(&a))
            .filter(|a| !a.is_empty()),
        published_at,
        source_name: clean(wire.source.name),
        image_url: wire.url_to_image.filter(|u| !u.is_empty()),
        category: category.article_tag().to_string(),
        url,
    }
}
