use super::kv::{KeyValueStore, StorageError};
use crate::news::Article;
use std::sync::Arc;

/// Storage key holding the JSON array of saved articles.
pub const BOOKMARKS_KEY: &str = "news-bookmarks";

/// Saved articles, in the order they were bookmarked.
///
/// Every mutation writes the whole updated list to the backing store first
/// and only then adopts it, so memory never runs ahead of what is persisted.
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    bookmarks: Vec<Article>,
}

impl BookmarkStore {
    /// Load the persisted list. A missing key starts empty.
    ///
    /// A stored value that does not parse is logged and ignored; it is left
    /// on disk until the next mutation overwrites it.
    pub fn init(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let bookmarks = match store.get(BOOKMARKS_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<Article>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored bookmarks are unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        tracing::debug!(count = bookmarks.len(), "Loaded bookmarks");
        Ok(Self { store, bookmarks })
    }

    /// Append `article`. Does not check for an existing entry with the same id.
    ///
    /// On a failed write the in-memory list is left unchanged.
    pub fn add(&mut self, article: Article) -> Result<(), StorageError> {
        tracing::debug!(id = %article.id, "Adding bookmark");
        let mut next = self.bookmarks.clone();
        next.push(article);
        self.persist(&next)?;
        self.bookmarks = next;
        Ok(())
    }

    /// Remove every entry whose id matches. Returns how many were removed.
    ///
    /// On a failed write the in-memory list is left unchanged.
    pub fn remove(&mut self, id: &str) -> Result<usize, StorageError> {
        let next: Vec<Article> = self
            .bookmarks
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        let removed = self.bookmarks.len() - next.len();
        tracing::debug!(id, removed, "Removing bookmark");
        self.persist(&next)?;
        self.bookmarks = next;
        Ok(removed)
    }

    /// Remove the article if it is bookmarked, otherwise add it.
    ///
    /// Returns `true` when the article is bookmarked afterwards.
    pub fn toggle(&mut self, article: &Article) -> Result<bool, StorageError> {
        if self.contains(&article.id) {
            self.remove(&article.id)?;
            Ok(false)
        } else {
            self.add(article.clone())?;
            Ok(true)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|a| a.id == id)
    }

    pub fn list(&self) -> &[Article] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    fn persist(&self, list: &[Article]) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(list).map_err(|source| StorageError::Serialize {
                key: BOOKMARKS_KEY.to_string(),
                source,
            })?;
        self.store.set(BOOKMARKS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Accepts writes until `fail` is set, then rejects every one.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn article(id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Story {id}"),
            description: "desc".into(),
            content: "content".into(),
            author: None,
            published_at: "2024-03-01T10:00:00Z".into(),
            source_name: "Wire".into(),
            image_url: None,
            category: "science".into(),
            url: format!("https://example.com/{id}"),
        }
    }

    fn persisted(store: &Arc<dyn KeyValueStore>) -> Vec<Article> {
        let raw = store.get(BOOKMARKS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_add_then_contains() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut bookmarks = BookmarkStore::init(Arc::clone(&store)).unwrap();

        bookmarks.add(article("a")).unwrap();
        assert!(bookmarks.contains("a"));
        assert!(!bookmarks.contains("b"));
        assert_eq!(persisted(&store), bookmarks.list());
    }

    #[test]
    fn test_remove_then_not_contains() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut bookmarks = BookmarkStore::init(Arc::clone(&store)).unwrap();

        bookmarks.add(article("a")).unwrap();
        bookmarks.add(article("b")).unwrap();
        assert_eq!(bookmarks.remove("a").unwrap(), 1);
        assert!(!bookmarks.contains("a"));
        assert_eq!(persisted(&store), bookmarks.list());
        assert_eq!(bookmarks.len(), 1);
    }

    #[test]
    fn test_add_appends_duplicates_and_remove_clears_all() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut bookmarks = BookmarkStore::init(Arc::clone(&store)).unwrap();

        bookmarks.add(article("a")).unwrap();
        bookmarks.add(article("a")).unwrap();
        assert_eq!(bookmarks.len(), 2);

        assert_eq!(bookmarks.remove("a").unwrap(), 2);
        assert!(bookmarks.is_empty());
        assert_eq!(persisted(&store), Vec::<Article>::new());
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut bookmarks = BookmarkStore::init(store).unwrap();
        let a = article("a");

        assert!(bookmarks.toggle(&a).unwrap());
        assert_eq!(bookmarks.len(), 1);
        assert!(!bookmarks.toggle(&a).unwrap());
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut bookmarks = BookmarkStore::init(store).unwrap();
        for id in ["c", "a", "b"] {
            bookmarks.add(article(id)).unwrap();
        }
        let ids: Vec<&str> = bookmarks.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reload_restores_list() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        {
            let mut bookmarks = BookmarkStore::init(Arc::clone(&store)).unwrap();
            bookmarks.add(article("a")).unwrap();
            bookmarks.add(article("b")).unwrap();
        }
        let reloaded = BookmarkStore::init(store).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.list()[1].id, "b");
    }

    #[test]
    fn test_malformed_value_starts_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(BOOKMARKS_KEY, "{not json").unwrap();

        let mut bookmarks = BookmarkStore::init(Arc::clone(&store)).unwrap();
        assert!(bookmarks.is_empty());
        // Untouched until the next mutation.
        assert_eq!(store.get(BOOKMARKS_KEY).unwrap().as_deref(), Some("{not json"));

        bookmarks.add(article("a")).unwrap();
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_list_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let mut bookmarks = BookmarkStore::init(store.clone()).unwrap();
        bookmarks.add(article("a")).unwrap();

        store.fail.store(true, Ordering::SeqCst);

        assert!(matches!(
            bookmarks.add(article("b")),
            Err(StorageError::Io { .. })
        ));
        assert!(!bookmarks.contains("b"));

        assert!(bookmarks.remove("a").is_err());
        assert!(bookmarks.contains("a"));

        assert!(bookmarks.toggle(&article("a")).is_err());
        assert_eq!(bookmarks.len(), 1);

        let raw = store.inner.get(BOOKMARKS_KEY).unwrap().unwrap();
        let on_disk: Vec<Article> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, bookmarks.list());
    }
}
