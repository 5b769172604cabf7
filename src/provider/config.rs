//! Identity provider endpoint configuration. Values are public; do not store
//! secrets here.

use super::api::{build_url_with_base, ProviderError};
use std::time::Duration;
use url::Url;

/// Default request timeout applied to every provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_AUTH_PATH: &str = "/api/auth";
pub const DEFAULT_PROVIDER_ID: &str = "credentials";

/// Where the identity provider lives and how to address its credentials flow.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub auth_path: String,
    pub provider_id: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Builds a config for `base_url` with default paths and timeout.
    ///
    /// # Errors
    /// Returns `ProviderError::Config` if the base URL is empty or not an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let base_url = normalize_value(base_url)
            .ok_or_else(|| ProviderError::Config("Provider URL is required.".to_string()))?;

        let parsed = Url::parse(&base_url)
            .map_err(|err| ProviderError::Config(format!("Invalid provider URL: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::Config(format!(
                "Unsupported provider URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_path: DEFAULT_AUTH_PATH.to_string(),
            provider_id: DEFAULT_PROVIDER_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Overrides the auth path; blank values keep the current one.
    #[must_use]
    pub fn with_auth_path(mut self, auth_path: &str) -> Self {
        if let Some(value) = normalize_value(auth_path) {
            self.auth_path = value;
        }
        self
    }

    /// Overrides the provider id; blank values keep the current one.
    #[must_use]
    pub fn with_provider_id(mut self, provider_id: &str) -> Self {
        if let Some(value) = normalize_value(provider_id) {
            self.provider_id = value.trim_matches('/').to_string();
        }
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }

    /// URL of an auth endpoint, e.g. `auth_url("csrf")`.
    #[must_use]
    pub fn auth_url(&self, endpoint: &str) -> String {
        let auth_base = build_url_with_base(&self.base_url, &self.auth_path);
        build_url_with_base(&auth_base, endpoint)
    }

    /// URL of an application path on the provider host, e.g. the post-login destination.
    #[must_use]
    pub fn app_url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
