//! Client for the paginated patient API.
//!
//! # Overview
//!
//! - [`ResilientFetcher`] sends one request with jittered exponential
//!   backoff on 429/500/503 and on connection failures.
//! - [`Paginator`] walks the collection endpoint, re-asking for pages that
//!   come back empty and stopping at the advertised page bound.
//! - [`PatientCollection`] deduplicates patients across pages, last write wins.
//! - [`PatientApi`] ties these together behind a [`ClientConfig`].
//!
//! All requests are sequential: one in flight at a time.

pub mod backoff;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod fetcher;
pub mod paginator;
pub mod submit;
pub mod transport;

use serde::Serialize;
use serde_json::Value;

pub use backoff::{Backoff, RetryPolicy};
pub use config::{API_KEY_VAR, API_URL_VAR, ClientConfig, DEFAULT_BASE_URL};
pub use dedupe::PatientCollection;
pub use error::{ConfigError, FetchError, Result, TransportError};
pub use fetcher::ResilientFetcher;
pub use paginator::{MAX_PAGE_LIMIT, Page, PageBound, PagePolicy, Paginator};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

/// Facade over the patient API for a given configuration.
#[derive(Debug)]
pub struct PatientApi<T = HttpTransport> {
    config: ClientConfig,
    fetcher: ResilientFetcher<T>,
}

impl PatientApi<HttpTransport> {
    /// Connect over HTTP using the credential in `config`.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> PatientApi<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let fetcher = ResilientFetcher::new(transport, config.retry);
        Self { config, fetcher }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn fetcher(&self) -> &ResilientFetcher<T> {
        &self.fetcher
    }

    /// Download every patient page and deduplicate by identifier.
    pub async fn fetch_patients(&self) -> Result<PatientCollection> {
        let endpoint = self.config.patients_url()?;
        Paginator::new(&self.fetcher, endpoint, self.config.paging)
            .fetch_all()
            .await
    }

    /// Submit an assessment payload.
    pub async fn submit(&self, payload: &impl Serialize) -> Result<Value> {
        let endpoint = self.config.submit_url()?;
        submit::submit(&self.fetcher, endpoint, payload).await
    }
}
