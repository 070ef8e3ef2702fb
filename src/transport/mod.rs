//! Notification transport layer.
//!
//! This module receives revision notifications pushed by the server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Server         │                              │  Client (Rust)  │
//! │                 │         WebSocket            │                 │
//! │  revision bus   │─────────────────────────────►│  Notification   │
//! │                 │   ws(s)://host/websocket     │  Channel        │
//! └─────────────────┘      text frame: "42"        └─────────────────┘
//! ```
//!
//! The connection is opened once. Reconnecting after it ends is left to
//! whoever supervises the client.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Endpoint derivation, WebSocket reader loop, manual channels |

// ============================================================================
// Submodules
// ============================================================================

/// Notification channel and reader loop.
pub mod channel;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{
    LIVE_UPDATE_PATH, Notification, NotificationChannel, NotificationSender, endpoint_for,
};
