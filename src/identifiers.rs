//! Type-safe identifiers.
//!
//! Newtype wrappers keep server revisions and refresh attempt IDs from
//! being mixed up with plain integers or strings.
//!
//! | Type | Inner | Source |
//! |------|-------|--------|
//! | [`Revision`] | `u64` | Server, one per content-affecting change |
//! | [`RefreshId`] | `Uuid` | Client, one per refresh attempt |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Revision
// ============================================================================

/// Server-issued identifier of a content version.
///
/// Revisions are only compared for equality; their numeric order carries
/// no meaning on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Creates a revision from its numeric value.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Payload that is not a valid revision literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid revision payload: {payload:?}")]
pub struct InvalidRevision {
    /// The rejected payload.
    pub payload: String,
}

impl FromStr for Revision {
    type Err = InvalidRevision;

    /// Parses a notification payload.
    ///
    /// Surrounding ASCII whitespace is ignored. The rest must be a plain
    /// decimal literal: no sign, no fraction, no trailing text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim_ascii();
        let invalid = || InvalidRevision {
            payload: s.to_string(),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        digits.parse::<u64>().map(Self).map_err(|_| invalid())
    }
}

impl From<u64> for Revision {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RefreshId
// ============================================================================

/// Identifier of a single refresh attempt.
///
/// Overlapping attempts are allowed, so each one carries its own ID through
/// logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshId(Uuid);

impl RefreshId {
    /// Generates a new random ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RefreshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_parse_plain() {
        assert_eq!("42".parse::<Revision>(), Ok(Revision::new(42)));
        assert_eq!("0".parse::<Revision>(), Ok(Revision::new(0)));
    }

    #[test]
    fn test_revision_parse_trims_whitespace() {
        assert_eq!(" 7\n".parse::<Revision>(), Ok(Revision::new(7)));
    }

    #[test]
    fn test_revision_parse_rejects_non_integers() {
        for payload in ["", "abc", "7abc", "-3", "+3", "1.5", "1e3", "18446744073709551616"] {
            assert!(payload.parse::<Revision>().is_err(), "accepted {payload:?}");
        }
    }

    #[test]
    fn test_revision_display() {
        assert_eq!(Revision::new(12).to_string(), "12");
    }

    #[test]
    fn test_revision_serde_transparent() {
        let json = serde_json::to_string(&Revision::new(5)).expect("serialize");
        assert_eq!(json, "5");
    }

    #[test]
    fn test_refresh_id_unique() {
        assert_ne!(RefreshId::generate(), RefreshId::generate());
    }
}
