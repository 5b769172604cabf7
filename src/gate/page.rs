//! Login page wiring. Composes the session observer and the submission controller
//! over injected capabilities and produces a presentation model that any surface
//! (terminal, web, tests) can render.

use super::{
    controller::{Phase, SubmissionController},
    exchange::ExchangeOperation,
    observer::{Gate, SessionObserver},
    session::{SessionSource, SessionStatus},
    Navigator,
};
use std::{future::Future, rc::Rc};
use tracing::debug;

/// Where a signed-in user is sent by default.
pub const DEFAULT_DESTINATION: &str = "/dashboard";

pub const WAITING_LABEL: &str = "Loading...";
pub const TITLE: &str = "Login";
pub const DESCRIPTION: &str = "Enter your credentials to access your account";
pub const IDENTIFIER_LABEL: &str = "Email";
pub const SECRET_LABEL: &str = "Password";
pub const SUBMIT_LABEL: &str = "Login";
pub const BUSY_LABEL: &str = "Logging in...";

/// Informational link shown under the form. Navigation only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub prompt: Option<&'static str>,
    pub label: &'static str,
    pub href: &'static str,
}

pub const SIGN_UP_LINK: Link = Link {
    prompt: Some("Don't have an account?"),
    label: "Sign up",
    href: "/signup",
};

pub const RECOVER_LINK: Link = Link {
    prompt: None,
    label: "Forgot your password?",
    href: "/auth/forgot-password",
};

/// Renderable state of the interactive form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub description: &'static str,
    pub identifier: String,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    /// Banner text; only present when the last attempt failed.
    pub error: Option<String>,
    pub links: [Link; 2],
}

/// What the login surface shows for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Waiting indicator: session unresolved, or a redirect is underway.
    Waiting,
    Form(FormView),
}

pub struct LoginPage<S, E, N> {
    session: Rc<S>,
    observer: SessionObserver<N>,
    controller: SubmissionController<E, N>,
}

impl<S, E, N> LoginPage<S, E, N>
where
    S: SessionSource,
    E: ExchangeOperation + 'static,
    N: Navigator + 'static,
{
    pub fn new(session: Rc<S>, exchange: Rc<E>, navigator: Rc<N>, destination: &str) -> Self {
        Self {
            session,
            observer: SessionObserver::new(Rc::clone(&navigator), destination),
            controller: SubmissionController::new(exchange, navigator, destination),
        }
    }

    /// Renders the page for the current session status.
    ///
    /// Once a submission succeeded the controller has already requested navigation,
    /// so the observer only records the status and the page keeps waiting. A session
    /// that turns authenticated mid-submission is left to whichever side settles it:
    /// the controller on success, the observer on the next render otherwise.
    pub fn render(&self) -> Screen {
        let status = self.session.status();
        match self.controller.phase() {
            Phase::Success => {
                self.observer.acknowledge(status);
                return Screen::Waiting;
            }
            Phase::Submitting if status == SessionStatus::Authenticated => {
                return Screen::Waiting;
            }
            _ => {}
        }

        match self.observer.observe(status) {
            Gate::Waiting => Screen::Waiting,
            Gate::Form => Screen::Form(self.form_view()),
        }
    }

    pub fn controller(&self) -> &SubmissionController<E, N> {
        &self.controller
    }

    /// [`SubmissionController::submit`], only while the form is on screen.
    #[must_use]
    pub fn submit(&self) -> Option<impl Future<Output = Option<Phase>> + 'static> {
        if self.session.status() != SessionStatus::Unauthenticated {
            debug!(status = %self.session.status(), "submission rejected, form not shown");
            return None;
        }
        self.controller.submit()
    }

    fn form_view(&self) -> FormView {
        self.controller.with_form(|form| FormView {
            title: TITLE,
            description: DESCRIPTION,
            identifier: form.identifier().to_string(),
            submit_label: if form.is_busy() { BUSY_LABEL } else { SUBMIT_LABEL },
            submit_enabled: !form.is_busy(),
            error: form.last_error().map(ToString::to_string),
            links: [SIGN_UP_LINK, RECOVER_LINK],
        })
    }
}
