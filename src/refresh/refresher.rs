//! Document refresher.
//!
//! One refresh attempt is exactly one of:
//!
//! - in-place replacement with freshly fetched markup, or
//! - a full reload when fetching or replacing failed.
//!
//! No retries, no backoff, no partial application.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::identifiers::{RefreshId, Revision};

use super::document::Document;
use super::fetch::Fetcher;

// ============================================================================
// RefreshOutcome
// ============================================================================

/// How a refresh attempt resynchronized the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Document replaced in place.
    Replaced {
        /// Size of the new markup in bytes.
        bytes: usize,
    },
    /// Fallback reload performed.
    Reloaded {
        /// Why the in-place path failed.
        reason: String,
    },
}

impl RefreshOutcome {
    /// Returns `true` if the fallback reload was used.
    #[inline]
    #[must_use]
    pub const fn is_reload(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }
}

// ============================================================================
// RefreshReport
// ============================================================================

/// Record of one finished refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Attempt identifier.
    pub id: RefreshId,
    /// Revision that triggered the attempt.
    pub revision: Revision,
    /// Address that was fetched.
    pub location: Url,
    /// What happened.
    pub outcome: RefreshOutcome,
}

// ============================================================================
// Refresher
// ============================================================================

/// Resynchronizes a [`Document`] using a [`Fetcher`].
///
/// Cheap to clone; every attempt may run in its own task.
#[derive(Clone)]
pub struct Refresher {
    document: Arc<dyn Document>,
    fetcher: Arc<dyn Fetcher>,
}

impl fmt::Debug for Refresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refresher")
            .field("location", &self.document.location().as_str())
            .finish_non_exhaustive()
    }
}

impl Refresher {
    /// Creates a refresher for `document`.
    #[must_use]
    pub fn new(document: Arc<dyn Document>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { document, fetcher }
    }

    /// Runs one refresh attempt for `revision`.
    ///
    /// Never fails: an error on the in-place path is answered with a reload
    /// and recorded in the report.
    pub async fn refresh(&self, revision: Revision) -> RefreshReport {
        let id = RefreshId::generate();
        let location = self.document.location();

        debug!(%id, %revision, %location, "Refreshing document");

        let outcome = match self.replace_in_place(&location).await {
            Ok(bytes) => {
                info!(%id, %revision, bytes, "Document replaced");
                RefreshOutcome::Replaced { bytes }
            }
            Err(e) => {
                warn!(%id, %revision, error = %e, "In-place refresh failed, reloading");
                self.document.reload().await;
                RefreshOutcome::Reloaded {
                    reason: e.to_string(),
                }
            }
        };

        RefreshReport {
            id,
            revision,
            location,
            outcome,
        }
    }

    /// Fetches `location` and swaps the document. Returns the markup size.
    async fn replace_in_place(&self, location: &Url) -> Result<usize> {
        let markup = self.fetcher.fetch(location).await?;
        let bytes = markup.len();
        self.document.replace(markup).await?;
        Ok(bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
