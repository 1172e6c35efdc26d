//! News retrieval through the key-holding relay.
//!
//! - [`types`] - categories, normalized articles, queries and pages
//! - [`client`] - HTTP client for the relay with timeout handling
//!
//! The client never sees the upstream credential; it only knows the relay URL.

mod client;
mod types;

pub use client::{NewsClient, NewsError, DEFAULT_TIMEOUT};
pub use types::{
    derive_article_id, Article, Category, NewsPage, NewsQuery, UnknownCategory,
    CONFIG_ERROR_MARKER, PAGE_SIZE,
};
