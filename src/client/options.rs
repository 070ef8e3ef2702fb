//! Client options.
//!
//! Tunables that leave the fixed parts of the design alone: the endpoint
//! path and the change rule are not configurable.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use live_update::{ClientOptions, MalformedPolicy};
//!
//! let options = ClientOptions::new()
//!     .with_malformed_policy(MalformedPolicy::Ignore)
//!     .with_fetch_timeout(Duration::from_secs(10))
//!     .with_user_agent("preview-pane/1.0");
//! ```
//!
//! Options can also be loaded from JSON:
//!
//! ```json
//! { "malformed_policy": "ignore", "fetch_timeout_ms": 10000 }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::MalformedPolicy;

// ============================================================================
// ClientOptions
// ============================================================================

/// Live-update client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientOptions {
    /// Handling of payloads that are not valid revisions.
    pub malformed_policy: MalformedPolicy,

    /// Fetch timeout in milliseconds. `None` waits forever.
    pub fetch_timeout_ms: Option<u64>,

    /// Treat non-2xx fetch responses as failures (reload instead of swap).
    pub reject_error_status: bool,

    /// User agent sent with re-fetch requests.
    pub user_agent: Option<String>,
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            malformed_policy: MalformedPolicy::Overwrite,
            fetch_timeout_ms: None,
            reject_error_status: false,
            user_agent: None,
        }
    }

    /// Parses options from JSON and validates them.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the JSON is malformed or has unknown fields
    /// - [`Error::Config`] if a value is out of range
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientOptions {
    /// Sets the malformed payload policy.
    #[inline]
    #[must_use]
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// Sets a fetch timeout.
    ///
    /// Rounded up to whole milliseconds, at least 1 ms. Values beyond
    /// `u64::MAX` milliseconds saturate.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        let mut millis = timeout.as_millis();
        if timeout.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }
        self.fetch_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX).max(1));
        self
    }

    /// Rejects non-2xx fetch responses.
    #[inline]
    #[must_use]
    pub fn with_reject_error_status(mut self) -> Self {
        self.reject_error_status = true;
        self
    }

    /// Sets the fetch user agent.
    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl ClientOptions {
    /// Returns the fetch timeout, if any.
    #[inline]
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero timeout or an empty user agent.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_ms == Some(0) {
            return Err(Error::config(
                "fetch_timeout_ms must be positive; omit it to disable the timeout",
            ));
        }

        if self.user_agent.as_deref().is_some_and(str::is_empty) {
            return Err(Error::config("user_agent must not be empty"));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ClientOptions::new();
        assert_eq!(options, ClientOptions::default());
        assert_eq!(options.malformed_policy, MalformedPolicy::Overwrite);
        assert!(options.fetch_timeout().is_none());
        assert!(!options.reject_error_status);
    }

    #[test]
    fn test_builder_methods() {
        let options = ClientOptions::new()
            .with_malformed_policy(MalformedPolicy::Ignore)
            .with_fetch_timeout(Duration::from_millis(1500))
            .with_reject_error_status()
            .with_user_agent("preview/1.0");

        assert_eq!(options.malformed_policy, MalformedPolicy::Ignore);
        assert_eq!(options.fetch_timeout(), Some(Duration::from_millis(1500)));
        assert!(options.reject_error_status);
        assert_eq!(options.user_agent.as_deref(), Some("preview/1.0"));
    }

    #[test]
    fn test_sub_millisecond_timeout_rounds_up() {
        let options = ClientOptions::new().with_fetch_timeout(Duration::from_micros(500));

        assert_eq!(options.fetch_timeout_ms, Some(1));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_fractional_timeout_rounds_up() {
        let options = ClientOptions::new().with_fetch_timeout(Duration::from_micros(1500));
        assert_eq!(options.fetch_timeout_ms, Some(2));
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let options = ClientOptions::new().with_fetch_timeout(Duration::MAX);

        assert_eq!(options.fetch_timeout_ms, Some(u64::MAX));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let options =
            ClientOptions::from_json(r#"{ "malformed_policy": "ignore", "fetch_timeout_ms": 250 }"#)
                .expect("parse");

        assert_eq!(options.malformed_policy, MalformedPolicy::Ignore);
        assert_eq!(options.fetch_timeout_ms, Some(250));
        assert!(options.user_agent.is_none());
    }

    #[test]
    fn test_from_json_empty_object() {
        let options = ClientOptions::from_json("{}").expect("parse");
        assert_eq!(options, ClientOptions::default());
    }

    #[test]
    fn test_from_json_unknown_field() {
        let err = ClientOptions::from_json(r#"{ "endpoint": "/ws" }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = ClientOptions::from_json(r#"{ "fetch_timeout_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let err = ClientOptions::new().with_user_agent("").validate().unwrap_err();
        assert!(err.to_string().contains("user_agent"));
    }
}
