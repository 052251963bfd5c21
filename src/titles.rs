//! Document title lookup.
//!
//! The title map is one JSON object, `{ "/route": "Title" }`, fetched once at
//! startup. Until then, and for routes missing from the map, lookups return the
//! configured default title.

use std::collections::HashMap;
use std::sync::OnceLock;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{FetchError, LoadError};
use crate::fetch::Fetcher;

/// Route → title mapping, populated exactly once.
#[derive(Debug)]
pub struct TitleStore {
    url: Url,
    default_title: String,
    titles: OnceLock<HashMap<String, String>>,
}

impl TitleStore {
    pub fn new(url: Url, default_title: impl Into<String>) -> Self {
        Self {
            url,
            default_title: default_title.into(),
            titles: OnceLock::new(),
        }
    }

    /// Fetch and install the title map. A store that is already loaded is left untouched.
    pub async fn load(&self, fetcher: &dyn Fetcher) -> Result<(), LoadError> {
        if self.is_loaded() {
            tracing::debug!(url = %self.url, "Title map already loaded");
            return Ok(());
        }

        let body = fetcher
            .fetch_text(&self.url, &CancellationToken::new())
            .await
            .map_err(|err| match err {
                FetchError::Status { url, status } => LoadError::Status { url, status },
                other => LoadError::Fetch {
                    url: self.url.to_string(),
                    source: other,
                },
            })?;

        let titles: HashMap<String, String> =
            serde_json::from_str(&body).map_err(|source| LoadError::Parse {
                url: self.url.to_string(),
                source,
            })?;

        let count = titles.len();
        if self.titles.set(titles).is_err() {
            // Another load finished first; its map stays.
            return Ok(());
        }
        tracing::info!(url = %self.url, titles = count, "Title map loaded");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.titles.get().is_some()
    }

    /// Title for `path`, or the default title.
    pub fn get(&self, path: &str) -> &str {
        self.titles
            .get()
            .and_then(|titles| titles.get(path))
            .map(String::as_str)
            .unwrap_or(&self.default_title)
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }

    /// Snapshot of the loaded map (empty before `load`).
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .titles
            .get()
            .map(|titles| {
                titles
                    .iter()
                    .map(|(path, title)| (path.as_str(), title.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_unstable();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    const TITLES: &str = "http://site/pages/titles.json";

    fn store() -> TitleStore {
        TitleStore::new(Url::parse(TITLES).unwrap(), "Portfolio")
    }

    #[test]
    fn test_unloaded_store_returns_default() {
        let store = store();
        assert!(!store.is_loaded());
        assert_eq!(store.get("/about"), "Portfolio");
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_loaded_lookups() {
        let fetcher = MemoryFetcher::new().with_body(TITLES, r#"{"/about": "About"}"#);
        let store = store();
        store.load(&fetcher).await.unwrap();

        assert_eq!(store.get("/about"), "About");
        assert_eq!(store.get("/missing"), "Portfolio");
        assert_eq!(store.entries(), vec![("/about", "About")]);
    }

    #[tokio::test]
    async fn test_load_happens_once() {
        let fetcher = MemoryFetcher::new().with_body(TITLES, r#"{"/": "Home"}"#);
        let store = store();
        store.load(&fetcher).await.unwrap();
        store.load(&fetcher).await.unwrap();

        assert_eq!(fetcher.requests(TITLES), 1);
        assert_eq!(store.get("/"), "Home");
    }

    #[tokio::test]
    async fn test_load_error_on_bad_status() {
        let fetcher = MemoryFetcher::new().with_status(TITLES, 503);
        let store = store();

        let err = store.load(&fetcher).await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 503, .. }));
        assert!(!store.is_loaded());
        assert_eq!(store.get("/about"), "Portfolio");
    }

    #[tokio::test]
    async fn test_load_error_on_malformed_document() {
        let fetcher = MemoryFetcher::new().with_body(TITLES, "[1, 2, 3]");
        let err = store().load(&fetcher).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
