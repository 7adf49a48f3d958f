//! Error types for the patient API client.

use thiserror::Error;

/// Longest response body excerpt carried in an error.
pub const MAX_ERROR_BODY_CHARS: usize = 300;

/// Configuration problems, detected before any network activity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The API credential is missing or blank.
    #[error("missing API key: set the {var} environment variable")]
    MissingApiKey {
        /// Environment variable that should hold the key.
        var: &'static str,
    },

    /// The base URL does not parse.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        url: String,
        reason: String,
    },

    /// The API key contains characters not allowed in an HTTP header.
    #[error("API key is not a valid header value")]
    InvalidApiKey,
}

/// Connection-level failure (refused, reset, timed out) before a status
/// code was received.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// Errors raised while talking to the patient API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Every attempt hit a rate limit or a transient server error.
    #[error(
        "request failed after {attempts} attempts (last status: {})",
        status_label(.last_status)
    )]
    Exhausted {
        attempts: u32,
        last_status: Option<u16>,
    },

    /// A non-retryable HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        /// Response body, truncated to [`MAX_ERROR_BODY_CHARS`].
        body: String,
    },

    /// Network failure on the final attempt.
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    /// Response or request body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FetchError {
    /// Returns a short message suitable for the operator.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Exhausted { .. } => "The patient API kept failing. Please try again later.",
            Self::Status { status: 401 | 403, .. } => "The patient API rejected the API key.",
            Self::Status { .. } => "The patient API returned an error.",
            Self::Transport(_) => "Could not connect to the patient API.",
            Self::Json(_) => "The patient API returned malformed data.",
            Self::Client(_) | Self::Config(_) => "The API client is misconfigured.",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Rate limiting and the transient server errors the fetcher waits out.
#[must_use]
pub const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 503)
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// Shorten a response body for inclusion in an error.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = FetchError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(err.user_message().contains("API key"));

        let err = FetchError::Exhausted {
            attempts: 10,
            last_status: Some(429),
        };
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(502));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn test_exhausted_display() {
        let err = FetchError::Exhausted {
            attempts: 10,
            last_status: Some(503),
        };
        assert_eq!(
            err.to_string(),
            "request failed after 10 attempts (last status: 503)"
        );
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(MAX_ERROR_BODY_CHARS + 50);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_CHARS + 1);
        assert!(truncated.ends_with('…'));
    }
}
