//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`LiveUpdateClient`]
//! instances.
//!
//! # Example
//!
//! ```no_run
//! use live_update::{LiveUpdateClient, MemoryDocument};
//!
//! # async fn example() -> live_update::Result<()> {
//! let document = MemoryDocument::parse("http://127.0.0.1:8000/index.html")?;
//!
//! let client = LiveUpdateClient::builder()
//!     .document(document)
//!     .on_refresh(|report| println!("{} -> {:?}", report.revision, report.outcome))
//!     .connect()
//!     .await?;
//!
//! client.run().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::refresh::{Document, Fetcher, HttpFetcher, RefreshReport, Refresher};
use crate::tracker::RevisionTracker;
use crate::transport::{NotificationChannel, endpoint_for};

use super::core::{LiveUpdateClient, RefreshHandler};
use super::options::ClientOptions;

// ============================================================================
// LiveUpdateClientBuilder
// ============================================================================

/// Builder for configuring a [`LiveUpdateClient`].
///
/// Use [`LiveUpdateClient::builder()`] to create a new builder.
#[derive(Default)]
pub struct LiveUpdateClientBuilder {
    /// Document to keep in sync.
    document: Option<Arc<dyn Document>>,
    /// Fetcher override (defaults to [`HttpFetcher`]).
    fetcher: Option<Arc<dyn Fetcher>>,
    /// Client options.
    options: ClientOptions,
    /// Pre-established channel.
    channel: Option<NotificationChannel>,
    /// Refresh report callback.
    refresh_handler: Option<RefreshHandler>,
}

impl fmt::Debug for LiveUpdateClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveUpdateClientBuilder")
            .field("has_document", &self.document.is_some())
            .field("has_fetcher", &self.fetcher.is_some())
            .field("options", &self.options)
            .field("has_channel", &self.channel.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LiveUpdateClientBuilder Implementation
// ============================================================================

impl LiveUpdateClientBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document to keep in sync.
    #[must_use]
    pub fn document(mut self, document: impl Document + 'static) -> Self {
        self.document = Some(Arc::new(document));
        self
    }

    /// Sets a custom fetcher instead of the HTTP one.
    #[must_use]
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Sets client options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses an already established channel instead of connecting.
    #[inline]
    #[must_use]
    pub fn channel(mut self, channel: NotificationChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Sets the refresh report callback.
    #[must_use]
    pub fn on_refresh(
        mut self,
        handler: impl Fn(&RefreshReport) + Send + Sync + 'static,
    ) -> Self {
        self.refresh_handler = Some(Box::new(handler));
        self
    }

    /// Builds the client around the channel given with [`channel`](Self::channel).
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if document or channel is missing, or options are invalid
    /// - [`Error::Http`] if the default fetcher cannot be created
    pub fn build(mut self) -> Result<LiveUpdateClient> {
        let channel = self.channel.take().ok_or_else(|| {
            Error::config(
                "Notification channel is required for build(). Use .channel() or connect() instead.",
            )
        })?;

        self.assemble(channel)
    }

    /// Connects to the endpoint derived from the document location and
    /// builds the client.
    ///
    /// A channel given with [`channel`](Self::channel) is used as is.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if document is missing, options are invalid or
    ///   the location has no host
    /// - [`Error::Connection`] if the WebSocket handshake fails
    pub async fn connect(mut self) -> Result<LiveUpdateClient> {
        // Nothing is opened for a configuration that cannot be assembled
        self.options.validate()?;
        let document = self.validate_document()?;

        let channel = match self.channel.take() {
            Some(channel) => channel,
            None => {
                let endpoint = endpoint_for(&document.location())?;
                debug!(%endpoint, "Connecting notification channel");
                NotificationChannel::connect(&endpoint).await?
            }
        };

        self.assemble(channel)
    }

    /// Wires validated parts into a client.
    fn assemble(self, channel: NotificationChannel) -> Result<LiveUpdateClient> {
        self.options.validate()?;
        let document = self.validate_document()?;

        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::from_options(&self.options)?),
        };

        let tracker = RevisionTracker::with_policy(self.options.malformed_policy);
        let refresher = Refresher::new(document, fetcher);

        Ok(LiveUpdateClient::new(
            channel,
            tracker,
            refresher,
            self.refresh_handler,
        ))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl LiveUpdateClientBuilder {
    /// Validates the document configuration.
    fn validate_document(&self) -> Result<Arc<dyn Document>> {
        self.document.clone().ok_or_else(|| {
            Error::config(
                "Document is required. Use .document() to set it.\n\
                 Example: LiveUpdateClient::builder().document(MemoryDocument::parse(url)?)",
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::refresh::MemoryDocument;
    use crate::tracker::MalformedPolicy;

    fn document() -> MemoryDocument {
        MemoryDocument::parse("http://localhost:8000/").expect("doc")
    }

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = LiveUpdateClientBuilder::new();
        assert!(builder.document.is_none());
        assert!(builder.fetcher.is_none());
        assert!(builder.channel.is_none());
        assert_eq!(builder.options, ClientOptions::default());
    }

    #[test]
    fn test_build_fails_without_document() {
        let (_sender, channel) = NotificationChannel::manual();
        let err = LiveUpdateClientBuilder::new().channel(channel).build().unwrap_err();

        assert!(err.to_string().contains("Document"));
    }

    #[test]
    fn test_build_fails_without_channel() {
        let err = LiveUpdateClientBuilder::new()
            .document(document())
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("channel"));
    }

    #[test]
    fn test_build_fails_with_invalid_options() {
        let (_sender, channel) = NotificationChannel::manual();
        let err = LiveUpdateClientBuilder::new()
            .document(document())
            .channel(channel)
            .options(ClientOptions::new().with_user_agent(""))
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_build_applies_policy() {
        let (_sender, channel) = NotificationChannel::manual();
        let client = LiveUpdateClientBuilder::new()
            .document(document())
            .channel(channel)
            .options(ClientOptions::new().with_malformed_policy(MalformedPolicy::Ignore))
            .build()
            .expect("build");

        assert_eq!(client.tracker().policy(), MalformedPolicy::Ignore);
        assert!(!client.tracker().is_armed());
    }

    #[tokio::test]
    async fn test_connect_fails_without_host() {
        let doc = MemoryDocument::parse("file:///tmp/index.html").expect("doc");
        let err = LiveUpdateClientBuilder::new()
            .document(doc)
            .connect()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_connect_rejects_options_before_dialing() {
        // Nothing listens here; a handshake attempt would surface as a connection error
        let doc = MemoryDocument::parse("http://127.0.0.1:9/").expect("doc");
        let err = LiveUpdateClientBuilder::new()
            .document(doc)
            .options(ClientOptions::new().with_user_agent(""))
            .connect()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_connect_requires_document_before_dialing() {
        let err = LiveUpdateClientBuilder::new().connect().await.unwrap_err();
        assert!(err.to_string().contains("Document"));
    }

    #[tokio::test]
    async fn test_connect_uses_given_channel() {
        let (_sender, channel) = NotificationChannel::manual();
        let client = LiveUpdateClientBuilder::new()
            .document(document())
            .channel(channel)
            .connect()
            .await;

        tokio_test::assert_ok!(client);
    }
}
