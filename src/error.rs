//! Error types for the navigation core.
//!
//! # Propagation
//! ```text
//! LoadError   → fatal to startup (Navigator::start returns it)
//! FetchError  → caught by navigate, triggers one fallback navigation
//! InitError   → caught by navigate, triggers one fallback navigation
//! Cancelled   → superseded or destroyed navigation, discarded silently
//! ```

use std::error::Error as StdError;

/// Boxed error returned by transports and page-init hooks.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The title document could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("title document {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("title document {url} is not a valid title map: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("title document {url} could not be fetched: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// A page fragment could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },

    #[error("cannot build a content URL for {route}: {source}")]
    Url {
        route: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    /// True when the fetch was superseded rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled { .. })
    }
}

/// A page-init hook failed, or its pending result rejected.
#[derive(Debug, thiserror::Error)]
#[error("page init for {route} failed: {source}")]
pub struct InitError {
    pub route: String,
    #[source]
    pub source: BoxError,
}

/// Failure of a single navigation attempt.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error(transparent)]
    Fetch(FetchError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error("navigation was cancelled")]
    Cancelled,
}

impl From<FetchError> for NavError {
    fn from(err: FetchError) -> Self {
        if err.is_cancelled() {
            NavError::Cancelled
        } else {
            NavError::Fetch(err)
        }
    }
}

/// A navigator could not be built from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid site URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("cache.max_size must be greater than zero")]
    ZeroCacheSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_fetch_maps_to_cancelled_navigation() {
        let err: NavError = FetchError::Cancelled { url: "http://x/pages/a.html".into() }.into();
        assert!(matches!(err, NavError::Cancelled));

        let err: NavError = FetchError::Status { url: "http://x/pages/a.html".into(), status: 404 }.into();
        assert!(matches!(err, NavError::Fetch(FetchError::Status { status: 404, .. })));
    }
}
