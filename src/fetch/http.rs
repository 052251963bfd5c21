//! reqwest-backed fetcher.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::FetchError;
use crate::fetch::Fetcher;

/// Fetches documents over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source: Box::new(source),
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &Url, cancel: &CancellationToken) -> Result<String, FetchError> {
        let cancelled = || FetchError::Cancelled { url: url.to_string() };

        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        tracing::trace!(url = %url, "GET");
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            result = self.get(url) => result?,
        };

        // A response that lands after cancellation is stale.
        if cancel.is_cancelled() {
            return Err(cancelled());
        }
        Ok(body)
    }
}
