//! Document fetching.
//!
//! # Data Flow
//! ```text
//! route path
//!     → SitePaths::content_url / titles_url
//!     → Fetcher::fetch_text(url, cancellation token)
//!     → text body, or FetchError (status / transport / cancelled)
//! ```
//!
//! # Design Decisions
//! - The token is checked before the request is issued and again on completion,
//!   so a superseded response is never handed back
//! - Non-success statuses are errors; the body is discarded
//! - The fetcher is a trait object so hosts can plug in their own transport

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::FetchError;

pub mod http;
pub mod memory;

pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

/// Retrieves a text document.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` as text, honoring `cancel`.
    async fn fetch_text(&self, url: &Url, cancel: &CancellationToken) -> Result<String, FetchError>;
}
