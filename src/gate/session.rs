//! Session status as seen by the gate. The status is owned by the identity
//! provider client; the gate only reads it and reacts to changes.

use std::fmt;
use tokio::sync::watch;

/// Whether the current user is signed in, or whether that is still being resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Pending,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Unauthenticated => "unauthenticated",
            SessionStatus::Authenticated => "authenticated",
        };
        formatter.write_str(label)
    }
}

/// Read-only view over an asynchronously updated session status.
pub trait SessionSource {
    /// Latest observed status.
    fn status(&self) -> SessionStatus;

    /// Receiver that is notified whenever the status changes.
    fn subscribe(&self) -> watch::Receiver<SessionStatus>;
}

/// Session source backed by a `watch` channel. Starts as `Pending`.
#[derive(Debug)]
pub struct WatchSession {
    sender: watch::Sender<SessionStatus>,
}

impl WatchSession {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionStatus::Pending);
        Self { sender }
    }

    /// Publishes `status`, notifying subscribers only when it actually changed.
    pub fn publish(&self, status: SessionStatus) {
        self.sender.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSource for WatchSession {
    fn status(&self) -> SessionStatus {
        *self.sender.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.sender.subscribe()
    }
}
