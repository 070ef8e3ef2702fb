//! Live update - revision-driven document refresh.
//!
//! This library keeps a displayed document in sync with server-side content
//! by reacting to "revision changed" push notifications.
//!
//! # Architecture
//!
//! The client follows a push model:
//!
//! - **Server**: bumps a revision on every content change and pushes it as a
//!   plain-text WebSocket frame to `ws(s)://<page-host>/websocket`
//! - **Client (Rust)**: compares each revision to the last one and, when it
//!   changed, re-fetches the page and swaps the whole document
//!
//! Key design principles:
//!
//! - The first revision only arms the tracker (no refresh on page load)
//! - Revision state has exactly one owner: the client's run loop
//! - A failed re-fetch always falls back to a full reload
//! - Refreshes run in their own tasks; overlapping attempts are allowed
//!
//! # Quick Start
//!
//! ```no_run
//! use live_update::{LiveUpdateClient, MemoryDocument, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let document = MemoryDocument::parse("http://127.0.0.1:8000/posts/hello.html")?;
//!
//!     let client = LiveUpdateClient::builder()
//!         .document(document.clone())
//!         .connect()
//!         .await?;
//!
//!     // Returns when the server closes the connection
//!     client.run().await?;
//!
//!     println!("Final markup: {}", document.markup());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`LiveUpdateClient`], builder and options |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | [`Revision`] and [`RefreshId`] |
//! | [`refresh`] | [`Document`], [`Fetcher`], [`Refresher`] |
//! | [`tracker`] | [`RevisionTracker`] state machine |
//! | [`transport`] | [`NotificationChannel`] over WebSocket |

// ============================================================================
// Modules
// ============================================================================

/// Live-update client, builder and options.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for revisions and refresh attempts.
pub mod identifiers;

/// Document abstraction, re-fetch and refresh with fallback reload.
pub mod refresh;

/// Revision tracking state machine.
pub mod tracker;

/// WebSocket notification transport.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{
    ClientHandle, ClientOptions, LiveUpdateClient, LiveUpdateClientBuilder, RefreshHandler,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{InvalidRevision, RefreshId, Revision};

// Refresh types
pub use refresh::{
    Document, DocumentChange, FetchResult, Fetcher, HttpFetcher, MemoryDocument, RefreshOutcome,
    RefreshReport, Refresher,
};

// Tracker types
pub use tracker::{ChangeDecision, MalformedPolicy, RevisionMarker, RevisionTracker, TrackerState};

// Transport types
pub use transport::{
    LIVE_UPDATE_PATH, Notification, NotificationChannel, NotificationSender, endpoint_for,
};
