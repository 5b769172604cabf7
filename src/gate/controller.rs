//! Submission controller. Owns the form state and drives one credential exchange
//! at a time.
//!
//! The in-flight exchange only keeps a weak reference to the form state. When the
//! controller is dropped before the exchange settles, the late result is discarded
//! instead of being applied to a torn-down page.

use super::{
    exchange::{Credentials, ExchangeOperation, ExchangeOutcome, FALLBACK_MESSAGE},
    Navigator,
};
use secrecy::SecretString;
use std::{
    cell::RefCell,
    fmt::Display,
    future::Future,
    rc::{Rc, Weak},
};
use tracing::{debug, error, info, info_span, warn, Instrument};
use ulid::Ulid;

/// Controller state. `Success` is terminal and hands off to navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Error,
    Success,
}

/// Local form state. `busy` is only true while an exchange is in flight.
#[derive(Debug, Default)]
pub struct FormState {
    identifier: String,
    secret: SecretString,
    busy: bool,
    last_error: Option<String>,
}

impl FormState {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[derive(Debug)]
struct Inner {
    form: FormState,
    phase: Phase,
}

impl Inner {
    /// Inputs are frozen while submitting and once sign-in succeeded.
    fn accepts_input(&self) -> bool {
        !self.form.busy && self.phase != Phase::Success
    }
}

/// Moved into the submission future. If the future is dropped before it
/// settles, the form is released back to `Idle` so it can be submitted again.
struct InFlight {
    state: Weak<RefCell<Inner>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut inner) = state.try_borrow_mut() else {
            return;
        };
        if inner.phase == Phase::Submitting {
            debug!("submission abandoned before the exchange settled");
            inner.form.busy = false;
            inner.phase = Phase::Idle;
        }
    }
}

pub struct SubmissionController<E, N> {
    inner: Rc<RefCell<Inner>>,
    exchange: Rc<E>,
    navigator: Rc<N>,
    destination: String,
}

impl<E, N> SubmissionController<E, N>
where
    E: ExchangeOperation + 'static,
    N: Navigator + 'static,
{
    pub fn new(exchange: Rc<E>, navigator: Rc<N>, destination: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                form: FormState::default(),
                phase: Phase::Idle,
            })),
            exchange,
            navigator,
            destination: destination.into(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.borrow().phase
    }

    /// Reads the form state without exposing it for mutation.
    pub fn with_form<R>(&self, read: impl FnOnce(&FormState) -> R) -> R {
        read(&self.inner.borrow().form)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.borrow().form.busy
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.borrow().form.last_error.clone()
    }

    /// Updates the identifier field. Ignored while an exchange is in flight and
    /// after a successful sign-in.
    pub fn set_identifier(&self, value: impl Into<String>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.accepts_input() {
            debug!("identifier input ignored");
            return false;
        }
        inner.form.identifier = value.into();
        true
    }

    /// Updates the secret field. Ignored while an exchange is in flight and after
    /// a successful sign-in.
    pub fn set_secret(&self, value: SecretString) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.accepts_input() {
            debug!("secret input ignored");
            return false;
        }
        inner.form.secret = value;
        true
    }

    /// Starts a submission with the current identifier and secret.
    ///
    /// Returns `None` when an exchange is already in flight or sign-in already
    /// succeeded; no second exchange is started. Otherwise the previous error is
    /// cleared, the form is marked busy and the returned future runs the exchange.
    /// It resolves to the settled phase, or to `None` when the controller was
    /// dropped before the exchange finished. Dropping the future early returns the
    /// form to `Idle`.
    #[must_use]
    pub fn submit(&self) -> Option<impl Future<Output = Option<Phase>> + 'static> {
        let credentials = {
            let mut inner = self.inner.borrow_mut();
            if inner.form.busy {
                debug!("submission rejected, an exchange is already in flight");
                return None;
            }
            if inner.phase == Phase::Success {
                debug!("submission rejected, already signed in");
                return None;
            }
            inner.form.last_error = None;
            inner.form.busy = true;
            inner.phase = Phase::Submitting;
            Credentials::new(inner.form.identifier.clone(), inner.form.secret.clone())
        };

        let guard = InFlight {
            state: Rc::downgrade(&self.inner),
        };
        let exchange = Rc::clone(&self.exchange);
        let navigator = Rc::clone(&self.navigator);
        let destination = self.destination.clone();
        let span = info_span!("sign_in", attempt = %Ulid::new());

        Some(
            async move {
                debug!("exchanging credentials");
                let result = exchange.exchange(&credentials).await;
                drop(credentials);

                let Some(state) = guard.state.upgrade() else {
                    debug!("controller dropped before the exchange settled, discarding result");
                    return None;
                };

                let phase = settle(&state, result);
                if phase == Phase::Success {
                    navigator.push(&destination);
                    navigator.refresh();
                }
                Some(phase)
            }
            .instrument(span),
        )
    }
}

/// Applies an exchange result to the form state. `busy` is cleared on every path.
fn settle<T: Display>(state: &RefCell<Inner>, result: Result<ExchangeOutcome, T>) -> Phase {
    let mut inner = state.borrow_mut();
    inner.form.busy = false;

    match result {
        Ok(ExchangeOutcome::Success) => {
            info!("credentials accepted");
            inner.form.last_error = None;
            inner.phase = Phase::Success;
        }
        Ok(ExchangeOutcome::Rejected(reason)) => {
            let reason = reason.trim();
            if reason.is_empty() {
                warn!("provider rejected credentials without a reason");
                inner.form.last_error = Some(FALLBACK_MESSAGE.to_string());
            } else {
                info!("provider rejected credentials");
                inner.form.last_error = Some(reason.to_string());
            }
            inner.phase = Phase::Error;
        }
        Err(err) => {
            error!(error = %err, "credential exchange failed");
            inner.form.last_error = Some(FALLBACK_MESSAGE.to_string());
            inner.phase = Phase::Error;
        }
    }

    inner.phase
}
