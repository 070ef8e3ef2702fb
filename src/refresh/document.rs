//! Displayed document abstraction.
//!
//! A [`Document`] is whatever renders the page: a webview, a preview pane,
//! or the in-memory [`MemoryDocument`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::error::Result;

// ============================================================================
// Document
// ============================================================================

/// The document kept in sync with the server.
#[async_trait]
pub trait Document: Send + Sync {
    /// Current page address, including query and fragment.
    ///
    /// Read at refresh time, so navigation since startup is honored.
    fn location(&self) -> Url;

    /// Discards the whole document and rebuilds it from `markup`.
    ///
    /// Nothing from the previous document is merged in.
    ///
    /// # Errors
    ///
    /// An error makes the refresher fall back to [`reload`](Self::reload).
    async fn replace(&self, markup: String) -> Result<()>;

    /// Reloads the current address through the platform's own page load.
    ///
    /// This is the recovery path and cannot fail.
    async fn reload(&self);
}

// ============================================================================
// DocumentChange
// ============================================================================

/// One change applied to a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentChange {
    /// Content replaced in place with this markup.
    Replaced(String),
    /// Full reload requested.
    Reloaded,
}

// ============================================================================
// MemoryDocument
// ============================================================================

/// Shared state of a [`MemoryDocument`].
struct MemoryDocumentState {
    location: Url,
    markup: String,
    history: Vec<DocumentChange>,
}

/// In-memory document.
///
/// Clones share state, so a caller can hand one clone to the client and
/// inspect another.
#[derive(Clone)]
pub struct MemoryDocument {
    inner: Arc<Mutex<MemoryDocumentState>>,
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("MemoryDocument")
            .field("location", &state.location.as_str())
            .field("markup_len", &state.markup.len())
            .field("changes", &state.history.len())
            .finish()
    }
}

impl MemoryDocument {
    /// Creates a document showing `markup` at `location`.
    #[must_use]
    pub fn new(location: Url, markup: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryDocumentState {
                location,
                markup: markup.into(),
                history: Vec::new(),
            })),
        }
    }

    /// Creates an empty document from a location string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if `location`
    /// does not parse.
    pub fn parse(location: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(location)?, String::new()))
    }

    /// Returns the current markup.
    #[must_use]
    pub fn markup(&self) -> String {
        self.inner.lock().markup.clone()
    }

    /// Navigates to another address without loading anything.
    pub fn set_location(&self, location: Url) {
        self.inner.lock().location = location;
    }

    /// Returns every change applied so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<DocumentChange> {
        self.inner.lock().history.clone()
    }

    /// Returns how many in-place replacements happened.
    #[must_use]
    pub fn replace_count(&self) -> usize {
        self.count(|change| matches!(change, DocumentChange::Replaced(_)))
    }

    /// Returns how many reloads were requested.
    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.count(|change| matches!(change, DocumentChange::Reloaded))
    }

    fn count(&self, predicate: impl Fn(&DocumentChange) -> bool) -> usize {
        self.inner.lock().history.iter().filter(|c| predicate(c)).count()
    }
}

#[async_trait]
impl Document for MemoryDocument {
    fn location(&self) -> Url {
        self.inner.lock().location.clone()
    }

    async fn replace(&self, markup: String) -> Result<()> {
        let mut state = self.inner.lock();
        state.history.push(DocumentChange::Replaced(markup.clone()));
        state.markup = markup;
        Ok(())
    }

    async fn reload(&self) {
        self.inner.lock().history.push(DocumentChange::Reloaded);
    }
}

// ============================================================================
// Tests
// ============================================================================
