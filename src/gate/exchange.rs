//! Credential exchange capability. The gate hands the identifier and secret to an
//! `ExchangeOperation` and expects exactly one of: success, a structured rejection,
//! or an error.

use secrecy::SecretString;
use std::{fmt, future::Future};

/// Message shown when a failure carries no provider-supplied reason.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Identifier and secret submitted together. The secret is never printed.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: SecretString) -> Self {
        Self {
            identifier: identifier.into(),
            secret,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("identifier", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Resolved outcome of an exchange that reached the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeOutcome {
    Success,
    /// The provider refused the credentials; the reason is safe to show the user.
    Rejected(String),
}

/// Submits credentials to an identity provider.
pub trait ExchangeOperation {
    /// Transport or protocol failure. Only logged, never shown to the user.
    type Error: fmt::Display;

    fn exchange(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<ExchangeOutcome, Self::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn credentials_debug_redacts_both_fields() {
        let credentials = Credentials::new("a@b.com", SecretString::from("hunter2".to_string()));
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("a@b.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_expose_values_on_request() {
        let credentials = Credentials::new("a@b.com", SecretString::from("hunter2".to_string()));
        assert_eq!(credentials.identifier(), "a@b.com");
        assert_eq!(credentials.secret().expose_secret(), "hunter2");
    }
}
