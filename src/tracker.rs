//! Revision tracking state machine.
//!
//! The tracker holds the last-observed revision and decides, for each new
//! notification, whether the served content changed.
//!
//! # States
//!
//! ```text
//!                 observe(any)
//!  Uninitialized ─────────────► Tracking(marker)
//!                                   │    ▲
//!                                   └────┘ observe(any)
//! ```
//!
//! Only a `Tracking(Valid(a))` → `Valid(b)` transition with `a != b`
//! produces [`ChangeDecision::Changed`]. The first message only arms the
//! tracker, so a page never refreshes right after it loads.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::identifiers::Revision;

// ============================================================================
// RevisionMarker
// ============================================================================

/// A parsed notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionMarker {
    /// Payload was a valid revision.
    Valid(Revision),
    /// Payload did not parse. Never equal to anything for change detection.
    Malformed,
}

impl RevisionMarker {
    /// Parses a raw payload into a marker.
    #[must_use]
    pub fn parse(raw_payload: &str) -> Self {
        raw_payload
            .parse::<Revision>()
            .map_or(Self::Malformed, Self::Valid)
    }

    /// Returns the revision if valid.
    #[inline]
    #[must_use]
    pub const fn revision(self) -> Option<Revision> {
        match self {
            Self::Valid(revision) => Some(revision),
            Self::Malformed => None,
        }
    }
}

// ============================================================================
// TrackerState
// ============================================================================

/// State of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No message received yet.
    #[default]
    Uninitialized,
    /// Holds the most recently stored marker.
    Tracking(RevisionMarker),
}

// ============================================================================
// ChangeDecision
// ============================================================================

/// Outcome of observing one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDecision {
    /// Served content changed; a refresh is due.
    Changed {
        /// Baseline before this notification.
        previous: Revision,
        /// Revision carried by this notification.
        current: Revision,
    },
    /// Nothing to do.
    Unchanged,
}

impl ChangeDecision {
    /// Returns `true` for [`ChangeDecision::Changed`].
    #[inline]
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

// ============================================================================
// MalformedPolicy
// ============================================================================

/// What to do with a payload that is not a valid revision.
///
/// Either way a malformed payload never triggers a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Store the malformed marker as the new baseline.
    ///
    /// Change detection stays disabled until a valid revision arrives and
    /// becomes the next baseline.
    #[default]
    Overwrite,
    /// Drop the payload and keep the current baseline.
    Ignore,
}

// ============================================================================
// RevisionTracker
// ============================================================================

/// Single-owner revision state for one live-update session.
#[derive(Debug, Clone, Default)]
pub struct RevisionTracker {
    state: TrackerState,
    policy: MalformedPolicy,
}

impl RevisionTracker {
    /// Creates an uninitialized tracker with the default policy.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an uninitialized tracker with the given malformed policy.
    #[inline]
    #[must_use]
    pub fn with_policy(policy: MalformedPolicy) -> Self {
        Self {
            state: TrackerState::Uninitialized,
            policy,
        }
    }

    /// Observes one raw notification payload.
    ///
    /// Compares against the stored baseline, then stores the parsed marker
    /// (subject to [`MalformedPolicy`]).
    pub fn observe(&mut self, raw_payload: &str) -> ChangeDecision {
        let marker = RevisionMarker::parse(raw_payload);

        let decision = match (self.state, marker) {
            (
                TrackerState::Tracking(RevisionMarker::Valid(previous)),
                RevisionMarker::Valid(current),
            ) if previous != current => ChangeDecision::Changed { previous, current },
            _ => ChangeDecision::Unchanged,
        };

        match (marker, self.policy) {
            (RevisionMarker::Malformed, MalformedPolicy::Ignore) => {
                debug!(payload = %raw_payload, "Ignoring malformed revision payload");
            }
            (RevisionMarker::Malformed, MalformedPolicy::Overwrite) => {
                debug!(payload = %raw_payload, "Storing malformed revision marker");
                self.state = TrackerState::Tracking(marker);
            }
            (RevisionMarker::Valid(revision), _) => {
                if self.state == TrackerState::Uninitialized {
                    debug!(%revision, "Tracker armed");
                }
                self.state = TrackerState::Tracking(marker);
            }
        }

        trace!(?decision, "Revision observed");
        decision
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Returns the malformed payload policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Returns the stored baseline if it is a valid revision.
    #[inline]
    #[must_use]
    pub fn last_revision(&self) -> Option<Revision> {
        match self.state {
            TrackerState::Tracking(marker) => marker.revision(),
            TrackerState::Uninitialized => None,
        }
    }

    /// Returns `true` once any message has been stored.
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, TrackerState::Tracking(_))
    }

    /// Forgets the baseline.
    ///
    /// The next message arms the tracker again without a refresh.
    pub fn reset(&mut self) {
        self.state = TrackerState::Uninitialized;
    }
}

// ============================================================================
// Tests
// ============================================================================
