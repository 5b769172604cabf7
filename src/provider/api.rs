//! HTTP helpers shared by provider calls: error type, URL building, and response
//! handling with sanitized error bodies. The helpers do not store secrets; callers
//! must still avoid logging request payloads.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

/// Maximum number of error body characters carried in an error.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(message) => write!(formatter, "Config error: {message}"),
            ProviderError::Network(message) => write!(formatter, "Network error: {message}"),
            ProviderError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ProviderError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            ProviderError::Parse(message) => write!(formatter, "Response error: {message}"),
            ProviderError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Builds a URL from an explicit base URL and the provided path.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `ProviderError` variants with timeout detection.
pub(crate) fn map_request_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ProviderError::Serialization(format!("Failed to build request: {err}"))
    } else if err.is_decode() {
        ProviderError::Parse(format!("Failed to decode response: {err}"))
    } else {
        ProviderError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
pub(crate) async fn handle_json_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| map_request_error(&err))?;

    if status.is_success() {
        serde_json::from_str::<T>(&body)
            .map_err(|err| ProviderError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(status, body))
    }
}

pub(crate) fn http_error(status: StatusCode, body: String) -> ProviderError {
    ProviderError::Http {
        status: status.as_u16(),
        message: sanitize_body(body),
    }
}

/// Sanitizes HTTP error bodies by trimming and truncating.
pub(crate) fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_with_base_joins_slashes_once() {
        assert_eq!(
            build_url_with_base("https://app.example.com/", "/api/auth"),
            "https://app.example.com/api/auth"
        );
        assert_eq!(
            build_url_with_base("https://app.example.com", "api/auth"),
            "https://app.example.com/api/auth"
        );
        assert_eq!(build_url_with_base("  ", "/api/auth"), "/api/auth");
    }

    #[test]
    fn sanitize_body_replaces_empty_bodies() {
        assert_eq!(sanitize_body("   ".to_string()), "Request failed.");
        assert_eq!(sanitize_body(" boom \n".to_string()), "boom");
    }

    #[test]
    fn sanitize_body_truncates_long_bodies() {
        let body = "x".repeat(MAX_ERROR_CHARS * 2);
        assert_eq!(sanitize_body(body).chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn http_error_display_includes_status() {
        let err = http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err.to_string(), "Request failed (502): upstream down");
    }
}
