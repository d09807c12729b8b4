//! HTTP content fetching
//!
//! The resolver and orchestrator only ever need "the text behind this URL",
//! so the network sits behind the [`ContentFetcher`] trait. Tests swap in a
//! mock server; the library ships [`HttpFetcher`] backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Fetches the text content behind a URL
///
/// An empty body is a valid result (`Ok("")`), distinct from a transport or
/// status failure. Implementations do not retry and do not cache.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] on transport failure and
    /// [`Error::HttpStatus`] when the server answers with a non-success
    /// status.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed [`ContentFetcher`]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wwdc-dl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        // Check HTTP status before reading the body
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
