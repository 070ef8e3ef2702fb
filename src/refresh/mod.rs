//! Document refresh.
//!
//! Turns a "revision changed" decision into a resynchronized document.
//!
//! # Flow
//!
//! ```text
//! refresh(revision)
//!   │
//!   ├─ Fetcher::fetch(document.location()) ── Ok(markup) ─► Document::replace(markup)
//!   │                                                            │
//!   └─ Err ◄──────────────────────────────────────────────────── Err
//!        │
//!        └─► Document::reload()
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `document` | [`Document`] trait and [`MemoryDocument`] |
//! | `fetch` | [`Fetcher`] trait and reqwest-backed [`HttpFetcher`] |
//! | `refresher` | [`Refresher`] and its reports |

// ============================================================================
// Submodules
// ============================================================================

/// Displayed document abstraction.
pub mod document;

/// Document re-fetch.
pub mod fetch;

/// Refresh attempt with fallback reload.
pub mod refresher;

// ============================================================================
// Re-exports
// ============================================================================

pub use document::{Document, DocumentChange, MemoryDocument};
pub use fetch::{FetchResult, Fetcher, HttpFetcher};
pub use refresher::{RefreshOutcome, RefreshReport, Refresher};
