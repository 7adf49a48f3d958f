//! Retry policy and jittered exponential backoff.

use std::time::Duration;

use rand::Rng;

/// How the fetcher retries rate-limited and transiently failing requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Wait before the first retry when the server gives no hint.
    pub initial_backoff: Duration,
    /// Growth factor applied after every wait.
    pub multiplier: f64,
    /// Upper bound on the un-jittered backoff.
    pub max_backoff: Duration,
    /// Proportional jitter band; 0.3 scales each wait by a factor in [0.7, 1.3].
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(500),
            multiplier: 1.8,
            max_backoff: Duration::from_millis(8000),
            jitter: 0.3,
        }
    }
}

/// Scale `duration` by a random factor within `1 ± ratio`.
///
/// Saturates at `Duration::MAX` instead of overflowing.
#[must_use]
pub fn jittered(duration: Duration, ratio: f64) -> Duration {
    if ratio <= 0.0 || duration.is_zero() {
        return duration;
    }
    let factor = rand::rng().random_range((1.0 - ratio)..=(1.0 + ratio));
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor.max(0.0))
        .unwrap_or(Duration::MAX)
}

/// Backoff state for one request.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    policy: RetryPolicy,
}

impl Backoff {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            current: policy.initial_backoff,
            policy,
        }
    }

    /// Un-jittered backoff that the next wait would use without a hint.
    #[must_use]
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Jittered delay for the next wait, then grow the backoff.
    ///
    /// A server-provided `hint` (from `Retry-After`) replaces the backoff for
    /// this wait only; the backoff still grows.
    pub fn next_delay(&mut self, hint: Option<Duration>) -> Duration {
        let base = hint.unwrap_or(self.current);
        let grown_ms = (self.current.as_secs_f64() * 1000.0 * self.policy.multiplier).round();
        self.current = Duration::from_millis(grown_ms as u64).min(self.policy.max_backoff);
        jittered(base, self.policy.jitter)
    }
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
///
/// HTTP-date values are not supported and yield `None`.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}
