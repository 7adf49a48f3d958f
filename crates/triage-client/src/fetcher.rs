//! Resilient fetcher: one logical request, retried through rate limits,
//! transient server errors and dropped connections.

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::backoff::{Backoff, RetryPolicy, parse_retry_after};
use crate::error::{FetchError, Result, is_retryable_status, truncate_body};
use crate::transport::{ApiRequest, Transport};

/// Sends requests through a [`Transport`] under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct ResilientFetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> ResilientFetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and parse the successful response as JSON.
    ///
    /// - 429: waits `Retry-After` seconds when given, otherwise the current
    ///   backoff; both are jittered.
    /// - 500 and 503: waits the current backoff.
    /// - Any other non-2xx status fails at once with a truncated body.
    /// - Connection errors are retried, except on the final attempt where
    ///   the error itself is returned.
    ///
    /// Fails with [`FetchError::Exhausted`] once `max_attempts` statuses in a
    /// row were retryable.
    pub async fn fetch(&self, request: &ApiRequest) -> Result<Value> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = Backoff::new(self.policy);
        let mut last_status = None;

        for attempt in 1..=max_attempts {
            let is_final = attempt == max_attempts;

            let delay = match self.transport.send(request).await {
                Ok(response) if response.is_success() => {
                    debug!(url = %request.url, status = response.status, attempt, "request succeeded");
                    return Ok(serde_json::from_str(&response.body)?);
                }
                Ok(response) if response.status == 429 => {
                    last_status = Some(response.status);
                    let hint = response.retry_after.as_deref().and_then(parse_retry_after);
                    let delay = backoff.next_delay(hint);
                    warn!(
                        url = %request.url,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited"
                    );
                    delay
                }
                Ok(response) if is_retryable_status(response.status) => {
                    last_status = Some(response.status);
                    let delay = backoff.next_delay(None);
                    warn!(
                        url = %request.url,
                        status = response.status,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "server error, retrying"
                    );
                    delay
                }
                Ok(response) => {
                    return Err(FetchError::Status {
                        status: response.status,
                        body: truncate_body(&response.body),
                    });
                }
                Err(error) if is_final => return Err(error.into()),
                Err(error) => {
                    let delay = backoff.next_delay(None);
                    warn!(
                        url = %request.url,
                        %error,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "network error, retrying"
                    );
                    delay
                }
            };

            if !is_final {
                sleep(delay).await;
            }
        }

        Err(FetchError::Exhausted {
            attempts: max_attempts,
            last_status,
        })
    }
}
