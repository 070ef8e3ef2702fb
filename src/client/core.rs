//! Live-update client run loop.
//!
//! Wires the notification channel, revision tracker and refresher together.
//!
//! # Run Loop
//!
//! ```text
//! channel.recv() ──► tracker.observe() ──Changed──► spawn(refresher.refresh())
//!       ▲                    │                              │
//!       └─── Unchanged ──────┘                              └─► refresh handler
//! ```
//!
//! Each notification is observed to completion before the next one is read.
//! Refreshes run in their own tasks, so a newer revision can start a second
//! refresh while an older one is still fetching. Attempts are neither
//! serialized nor cancelled.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::identifiers::Revision;
use crate::refresh::{RefreshReport, Refresher};
use crate::tracker::{ChangeDecision, RevisionTracker};
use crate::transport::{Notification, NotificationChannel};

use super::builder::LiveUpdateClientBuilder;

// ============================================================================
// Types
// ============================================================================

/// Refresh report callback.
///
/// Called once per finished refresh attempt, from the attempt's task.
pub type RefreshHandler = Box<dyn Fn(&RefreshReport) + Send + Sync>;

/// Internal commands for the run loop.
#[derive(Debug)]
enum ClientCommand {
    /// Close the channel and return from `run`.
    Shutdown,
}

// ============================================================================
// ClientHandle
// ============================================================================

/// Remote control for a running client.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    command_tx: mpsc::UnboundedSender<ClientCommand>,
}

impl ClientHandle {
    /// Asks the client to close its channel and stop.
    ///
    /// Refreshes already in flight are not cancelled.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ClientCommand::Shutdown);
    }
}

// ============================================================================
// LiveUpdateClient
// ============================================================================

/// Keeps one document in sync with revision notifications.
pub struct LiveUpdateClient {
    /// Source of notifications.
    channel: NotificationChannel,
    /// Baseline state, owned by this loop only.
    tracker: RevisionTracker,
    /// Shared by all refresh tasks.
    refresher: Refresher,
    /// Report callback (shared with refresh tasks).
    refresh_handler: Arc<Mutex<Option<RefreshHandler>>>,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    command_rx: mpsc::UnboundedReceiver<ClientCommand>,
}

impl fmt::Debug for LiveUpdateClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveUpdateClient")
            .field("tracker", &self.tracker)
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}

impl LiveUpdateClient {
    /// Creates a new client builder.
    #[inline]
    #[must_use]
    pub fn builder() -> LiveUpdateClientBuilder {
        LiveUpdateClientBuilder::new()
    }

    /// Assembles a client from its parts.
    pub(crate) fn new(
        channel: NotificationChannel,
        tracker: RevisionTracker,
        refresher: Refresher,
        refresh_handler: Option<RefreshHandler>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        Self {
            channel,
            tracker,
            refresher,
            refresh_handler: Arc::new(Mutex::new(refresh_handler)),
            command_tx,
            command_rx,
        }
    }

    /// Returns a handle that can stop [`run`](Self::run) from another task.
    #[must_use]
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Returns the revision tracker.
    #[inline]
    #[must_use]
    pub fn tracker(&self) -> &RevisionTracker {
        &self.tracker
    }

    /// Sets the refresh report callback.
    pub fn set_refresh_handler(&self, handler: RefreshHandler) {
        let mut guard = self.refresh_handler.lock();
        *guard = Some(handler);
    }

    /// Clears the refresh report callback.
    pub fn clear_refresh_handler(&self) {
        let mut guard = self.refresh_handler.lock();
        *guard = None;
    }

    /// Observes one notification and starts a refresh on change.
    ///
    /// # Panics
    ///
    /// Panics if a change is detected outside a tokio runtime, since the
    /// refresh is started with [`tokio::spawn`].
    pub fn handle_notification(&mut self, notification: &Notification) -> ChangeDecision {
        let decision = self.tracker.observe(notification.payload());

        if let ChangeDecision::Changed { previous, current } = decision {
            info!(%previous, %current, "Revision changed");
            self.spawn_refresh(current);
        }

        decision
    }

    /// Processes notifications until the channel ends or shutdown is requested.
    ///
    /// Returns `Ok(())` when the server closes the connection or the client is
    /// shut down. Reconnecting is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the connection failed.
    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                item = self.channel.recv() => {
                    match item {
                        Some(Ok(notification)) => {
                            self.handle_notification(&notification);
                        }

                        Some(Err(e)) => {
                            warn!(error = %e, "Notification channel failed");
                            return Err(e);
                        }

                        None => {
                            info!("Notification channel ended");
                            return Ok(());
                        }
                    }
                }

                command = self.command_rx.recv() => {
                    match command {
                        Some(ClientCommand::Shutdown) | None => {
                            debug!("Shutdown command received");
                            self.channel.close();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Starts a refresh task for `revision`.
    fn spawn_refresh(&self, revision: Revision) {
        let refresher = self.refresher.clone();
        let handler = Arc::clone(&self.refresh_handler);

        tokio::spawn(async move {
            let report = refresher.refresh(revision).await;

            if let Some(ref handler) = *handler.lock() {
                handler(&report);
            }
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
