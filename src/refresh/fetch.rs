//! Document re-fetch.
//!
//! The fetch step produces an explicit [`FetchResult`]. Any error sends the
//! refresher down its reload branch.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::client::ClientOptions;
use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Result of one fetch: the response body as text.
pub type FetchResult = Result<String>;

// ============================================================================
// Fetcher
// ============================================================================

/// Retrieves the markup served at a page address.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues a single GET for `url` and reads the whole body as text.
    async fn fetch(&self, url: &Url) -> FetchResult;
}

// ============================================================================
// HttpFetcher
// ============================================================================

/// [`Fetcher`] backed by a reqwest client.
///
/// No cache-busting parameters are added and no retries are made.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    reject_error_status: bool,
}

impl HttpFetcher {
    /// Creates a fetcher with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::from_options(&ClientOptions::default())
    }

    /// Creates a fetcher honoring timeout, user agent and status options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be initialized.
    pub fn from_options(options: &ClientOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = options.fetch_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(ref user_agent) = options.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
            reject_error_status: options.reject_error_status,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(url.as_str(), e.to_string()))?;

        let status = response.status();
        if self.reject_error_status && !status.is_success() {
            return Err(Error::http_status(url.as_str(), status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch(url.as_str(), e.to_string()))?;

        debug!(%url, status = status.as_u16(), bytes = body.len(), "Document fetched");
        Ok(body)
    }
}

// ============================================================================
// Tests
// ============================================================================
