//! Sign-in gate state machine. The observer decides whether the form may be shown
//! at all, the controller owns the form and the in-flight exchange, and the page
//! wires both to injected capabilities.
//!
//! Everything here runs on a single logical thread: state lives behind `Rc` and
//! `RefCell`, and input events and exchange completions are never processed at the
//! same time. The only suspension point is the credential exchange.

pub mod controller;
pub mod exchange;
pub mod observer;
pub mod page;
pub mod session;

pub use controller::{FormState, Phase, SubmissionController};
pub use exchange::{Credentials, ExchangeOperation, ExchangeOutcome, FALLBACK_MESSAGE};
pub use observer::{Gate, SessionObserver};
pub use page::{FormView, Link, LoginPage, Screen, DEFAULT_DESTINATION};
pub use session::{SessionSource, SessionStatus, WatchSession};

/// Navigation sink used once the user is signed in.
pub trait Navigator {
    /// Moves to `destination`, a path relative to the application root.
    fn push(&self, destination: &str);

    /// Invalidates cached views tied to the previous session.
    fn refresh(&self);
}
