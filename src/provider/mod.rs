//! HTTP identity provider speaking the NextAuth-compatible credentials flow.
//!
//! Flow Overview: a CSRF token is fetched from `{auth}/csrf`, then the credentials
//! are posted as a form to `{auth}/callback/{provider}` with `json=true`. The reply
//! carries a redirect URL; an `error` query parameter on it is the provider's
//! rejection reason. Session state is read from `{auth}/session`. A cookie store
//! keeps the CSRF and session cookies between calls.
//!
//! Credentials and cookies must never be logged.

pub mod api;
pub mod config;
pub mod session;

pub use api::ProviderError;
pub use config::ProviderConfig;
pub use session::{ProviderSession, SessionUser, UserSession};

use crate::{
    gate::{Credentials, ExchangeOperation, ExchangeOutcome},
    APP_USER_AGENT,
};
use api::{handle_json_response, http_error, map_request_error};
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfResponse {
    csrf_token: String,
}

#[derive(Deserialize)]
struct CallbackResponse {
    url: Option<String>,
}

/// Client for one identity provider. Cheap to clone; clones share the cookie store.
#[derive(Clone, Debug)]
pub struct IdentityProvider {
    client: Client,
    config: ProviderConfig,
}

impl IdentityProvider {
    /// # Errors
    /// Returns `ProviderError::Config` if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Fetches the anti-forgery token required by the credentials callback.
    ///
    /// # Errors
    /// Returns an error if the request fails or the token is missing.
    #[instrument(skip(self))]
    pub async fn csrf_token(&self) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(self.config.auth_url("csrf"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| map_request_error(&err))?;

        let body: CsrfResponse = handle_json_response(response).await?;
        if body.csrf_token.trim().is_empty() {
            return Err(ProviderError::Parse(
                "CSRF response did not include a token.".to_string(),
            ));
        }

        Ok(body.csrf_token)
    }

    /// Submits credentials and interprets the provider's redirect reply.
    ///
    /// # Errors
    /// Returns an error on transport failures, HTTP errors without a structured
    /// reason, or replies that carry neither a redirect nor an error.
    #[instrument(skip_all, fields(provider = %self.config.provider_id))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<ExchangeOutcome, ProviderError> {
        let csrf_token = self.csrf_token().await?;
        let callback = self
            .config
            .auth_url(&format!("callback/{}", self.config.provider_id));

        let form = [
            ("email", credentials.identifier()),
            ("password", credentials.secret().expose_secret()),
            ("csrfToken", csrf_token.as_str()),
            ("callbackUrl", self.config.base_url.as_str()),
            ("json", "true"),
        ];

        let response = self
            .client
            .post(callback)
            .header(header::ACCEPT, "application/json")
            .header("X-Auth-Return-Redirect", "1")
            .form(&form)
            .send()
            .await
            .map_err(|err| map_request_error(&err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| map_request_error(&err))?;
        debug!(status = status.as_u16(), "credentials callback replied");

        interpret_callback(&self.config.base_url, status, body)
    }

    /// Fetches the current session. Returns `None` when there is no signed-in user.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn fetch_session(&self) -> Result<Option<UserSession>, ProviderError> {
        let response = self
            .client
            .get(self.config.auth_url("session"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| map_request_error(&err))?;

        if matches!(
            response.status(),
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED
        ) {
            return Ok(None);
        }

        let session: Option<UserSession> = handle_json_response(response).await?;
        Ok(session.filter(|session| session.user.is_some()))
    }
}

impl ExchangeOperation for IdentityProvider {
    type Error = ProviderError;

    async fn exchange(&self, credentials: &Credentials) -> Result<ExchangeOutcome, ProviderError> {
        self.sign_in(credentials).await
    }
}

/// Maps the callback reply to an outcome. A reply without a redirect URL is never
/// treated as success.
fn interpret_callback(
    base_url: &str,
    status: StatusCode,
    body: String,
) -> Result<ExchangeOutcome, ProviderError> {
    let redirect = serde_json::from_str::<CallbackResponse>(&body)
        .ok()
        .and_then(|reply| reply.url);

    match redirect {
        Some(redirect) => {
            if let Some(reason) = error_param(base_url, &redirect) {
                Ok(ExchangeOutcome::Rejected(reason))
            } else if status.is_success() {
                Ok(ExchangeOutcome::Success)
            } else {
                Err(http_error(status, body))
            }
        }
        None if status.is_success() => Err(ProviderError::Parse(
            "Sign-in response did not include a redirect URL.".to_string(),
        )),
        None => Err(http_error(status, body)),
    }
}

/// Extracts the `error` query parameter from an absolute or relative redirect URL.
fn error_param(base_url: &str, redirect: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let url = base.join(redirect).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "error")
        .map(|(_, value)| value.into_owned())
}
