//! In-memory fetcher for tests and offline hosts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::FetchError;
use crate::fetch::Fetcher;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

/// A [`Fetcher`] answering from a fixed URL → response table.
///
/// Unknown URLs answer 404. Every call is counted, including cancelled ones.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    replies: HashMap<String, Reply>,
    latency: Duration,
    requests: DashMap<String, usize>,
    total: AtomicUsize,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a 200 and `body`.
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.replies.insert(url.into(), Reply::Body(body.into()));
        self
    }

    /// Answer `url` with a bare status code.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.replies.insert(url.into(), Reply::Status(status));
        self
    }

    /// Delay every response, simulating network time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of requests issued for `url`.
    pub fn requests(&self, url: &str) -> usize {
        self.requests.get(url).map(|count| *count).unwrap_or(0)
    }

    /// Number of requests issued overall.
    pub fn total_requests(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch_text(&self, url: &Url, cancel: &CancellationToken) -> Result<String, FetchError> {
        let key = url.as_str();
        let cancelled = || FetchError::Cancelled { url: key.to_string() };

        if cancel.is_cancelled() {
            return Err(cancelled());
        }
        *self.requests.entry(key.to_string()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled()),
                _ = tokio::time::sleep(self.latency) => {}
            }
        }
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        match self.replies.get(key) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(FetchError::Status {
                url: key.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: key.to_string(),
                status: 404,
            }),
        }
    }
}
