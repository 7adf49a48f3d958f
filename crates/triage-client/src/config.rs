//! Client configuration.
//!
//! The API key comes from the environment and is required; everything else
//! has a default that the CLI may override.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::backoff::RetryPolicy;
use crate::error::ConfigError;
use crate::paginator::PagePolicy;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "TRIAGE_API_KEY";

/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "TRIAGE_API_URL";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com/api";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PATIENTS_PATH: &str = "patients";
const SUBMIT_PATH: &str = "submit-assessment";

/// Everything the client needs to talk to the patient API.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: Url,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub paging: PagePolicy,
}

impl ClientConfig {
    /// Create a configuration with default tunables.
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, ConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey { var: API_KEY_VAR });
        }

        Ok(Self {
            api_key,
            base_url: parse_base_url(base_url)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            paging: PagePolicy::default(),
        })
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        let base_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, &base_url)
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Patient collection endpoint.
    pub fn patients_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(PATIENTS_PATH)
    }

    /// Assessment submission endpoint.
    pub fn submit_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(SUBMIT_PATH)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(path)
            .map_err(|e| ConfigError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .field("paging", &self.paging)
            .finish()
    }
}

/// Parse a base URL so that relative endpoint joins append to its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { var: API_KEY_VAR }));

        let err = ClientConfig::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[(API_KEY_VAR, " key ")])).unwrap();
        assert_eq!(config.api_key(), "key");
        assert_eq!(
            config.patients_url().unwrap().as_str(),
            "https://assessment.ksensetech.com/api/patients"
        );
        assert_eq!(
            config.submit_url().unwrap().as_str(),
            "https://assessment.ksensetech.com/api/submit-assessment"
        );
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_url_override() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "key"),
            (API_URL_VAR, "http://localhost:8080/v2/"),
        ]))
        .unwrap();
        assert_eq!(
            config.patients_url().unwrap().as_str(),
            "http://localhost:8080/v2/patients"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = ClientConfig::new("key", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
        let err = ClientConfig::new("key", "mailto:someone@example.test").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ClientConfig::new("super-secret", DEFAULT_BASE_URL).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
