//! # Vestibule (credential sign-in gate)
//!
//! `vestibule` collects an identifier and a secret, exchanges them with an
//! external identity provider, and either routes the user to the post-login
//! destination or surfaces a readable error.
//!
//! The crate is split in two halves:
//!
//! - [`gate`] holds the state machine: a session observer that gates rendering on
//!   the provider's session status, and a submission controller that drives the
//!   credential exchange. It only talks to the outside world through injected
//!   capabilities (`SessionSource`, `ExchangeOperation`, `Navigator`), so it can be
//!   exercised in isolation.
//! - [`provider`] implements those capabilities against a NextAuth-compatible
//!   credentials endpoint over HTTP.
//!
//! ## Sign-in Flow
//!
//! 1. **Hydrate:** the session is fetched once; until it resolves only a waiting
//!    indicator is shown.
//! 2. **Already signed in:** the observer requests navigation exactly once and keeps
//!    the waiting indicator up so the form never flashes.
//! 3. **Submit:** the controller clears the previous error, marks itself busy and
//!    calls the exchange. A second submit while busy is rejected.
//! 4. **Settle:** a structured rejection is shown verbatim; transport failures show a
//!    generic message and are logged for operators. Success requests navigation and
//!    a session refresh.
//!
//! Secrets are held as `SecretString` and must never be logged.

pub mod cli;
pub mod gate;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
