//! Session observer. Decides on every render whether the form may be shown and
//! sends an already signed-in user to the post-login destination.

use super::{Navigator, SessionStatus};
use std::{cell::Cell, rc::Rc};
use tracing::{debug, info};

/// What the login surface may show for the current session status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Neutral waiting indicator; the form is not interactive.
    Waiting,
    /// Interactive form.
    Form,
}

pub struct SessionObserver<N> {
    navigator: Rc<N>,
    destination: String,
    redirected: Cell<bool>,
}

impl<N: Navigator> SessionObserver<N> {
    pub fn new(navigator: Rc<N>, destination: impl Into<String>) -> Self {
        Self {
            navigator,
            destination: destination.into(),
            redirected: Cell::new(false),
        }
    }

    /// Evaluates `status` for one render.
    ///
    /// Navigation fires once per transition into `Authenticated`; further renders
    /// while still authenticated only keep the waiting indicator up.
    pub fn observe(&self, status: SessionStatus) -> Gate {
        match status {
            SessionStatus::Pending => {
                self.redirected.set(false);
                Gate::Waiting
            }
            SessionStatus::Unauthenticated => {
                self.redirected.set(false);
                Gate::Form
            }
            SessionStatus::Authenticated => {
                if self.redirected.replace(true) {
                    debug!("session still authenticated, redirect already requested");
                } else {
                    info!(destination = %self.destination, "session authenticated, redirecting");
                    self.navigator.push(&self.destination);
                }
                Gate::Waiting
            }
        }
    }

    /// Records `status` without navigating, for when a redirect was already
    /// requested elsewhere (a successful submission).
    pub fn acknowledge(&self, status: SessionStatus) {
        self.redirected.set(status == SessionStatus::Authenticated);
    }
}
