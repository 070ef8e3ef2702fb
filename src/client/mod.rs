//! Live-update client.
//!
//! This module provides the main entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LiveUpdateClient`] | Run loop tying channel, tracker and refresher together |
//! | [`LiveUpdateClientBuilder`] | Fluent configuration builder |
//! | [`ClientOptions`] | Tunables (policy, timeout, status handling) |
//! | [`ClientHandle`] | Shutdown control for a running client |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

/// Client options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::LiveUpdateClientBuilder;
pub use self::core::{ClientHandle, LiveUpdateClient, RefreshHandler};
pub use options::ClientOptions;
