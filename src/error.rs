//! Error types for the live-update client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! Setup operations and the transport loop return [`Result<T>`] which uses
//! [`Error`]:
//!
//! ```ignore
//! use live_update::{LiveUpdateClient, MemoryDocument, Result};
//!
//! async fn example(document: MemoryDocument) -> Result<()> {
//!     let client = LiveUpdateClient::builder().document(document).connect().await?;
//!     client.run().await
//! }
//! ```
//!
//! Refresh failures are never returned to a caller. They are recovered by
//! the fallback reload and only show up in a [`RefreshOutcome`].
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidUrl`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::WebSocket`] |
//! | Fetch | [`Error::Fetch`], [`Error::HttpStatus`], [`Error::Http`] |
//! | Document | [`Error::Document`] |
//! | External | [`Error::Json`] |
//!
//! [`RefreshOutcome`]: crate::refresh::RefreshOutcome

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;
use url::ParseError as UrlParseError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the client builder or options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// URL could not be parsed or rewritten.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlParseError),

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Notification channel could not be established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Notification channel closed before the operation completed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    // ========================================================================
    // Fetch Errors
    // ========================================================================
    /// Re-fetch of the document failed.
    #[error("Fetch of {url} failed: {message}")]
    Fetch {
        /// Address that was fetched.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// Re-fetch answered with a rejected status code.
    ///
    /// Only produced when error statuses are configured to be rejected.
    #[error("Fetch of {url} returned status {status}")]
    HttpStatus {
        /// Address that was fetched.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Document replacement failed.
    #[error("Document error: {message}")]
    Document {
        /// Description of the document error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a fetch error.
    #[inline]
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a rejected status error.
    #[inline]
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a document error.
    #[inline]
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error came from the re-fetch step.
    #[inline]
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::HttpStatus { .. } | Self::Http(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("refused");
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("document is required");
        assert_eq!(err.to_string(), "Configuration error: document is required");
    }

    #[test]
    fn test_fetch_error_display() {
        let err = Error::fetch("http://localhost/", "connection reset");
        assert_eq!(
            err.to_string(),
            "Fetch of http://localhost/ failed: connection reset"
        );
    }

    #[test]
    fn test_http_status_display() {
        let err = Error::http_status("http://localhost/missing", 404);
        assert_eq!(
            err.to_string(),
            "Fetch of http://localhost/missing returned status 404"
        );
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("test").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::config("test").is_connection_error());
        assert!(!Error::fetch("u", "m").is_connection_error());
    }

    #[test]
    fn test_is_fetch_error() {
        assert!(Error::fetch("u", "m").is_fetch_error());
        assert!(Error::http_status("u", 500).is_fetch_error());
        assert!(!Error::document("broken").is_fetch_error());
    }

    #[test]
    fn test_from_url_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
