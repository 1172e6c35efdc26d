//! Local persistence: a key-value store and the two services built on it.
//!
//! - [`kv`] - `KeyValueStore` trait, file-backed and in-memory stores
//! - [`bookmarks`] - saved articles under `news-bookmarks`
//! - [`theme`] - light/dark preference under `theme`
//!
//! Both services are created once at startup with `init()` and handed to
//! their consumers explicitly.

mod bookmarks;
mod kv;
mod theme;

pub use bookmarks::{BookmarkStore, BOOKMARKS_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use theme::{ThemeStore, THEME_KEY};
