//! Retrying fetch wrapper with linear backoff.
//!
//! Every failure class takes the same path: wait `base_backoff * attempt`
//! and try again. Rate limiting (HTTP 429) is not special-cased beyond its
//! error variant; the schedule is identical. When the attempt budget is
//! spent the fetcher reports [`FetchError::Exhausted`] carrying the last
//! underlying cause.
//!
//! The backoff wait is a real `tokio::time::sleep` suspension, so other
//! in-flight fetches keep making progress while one backs off.

use std::time::Duration;

use tracing::debug;

use super::http::AsyncHttpClient;
use super::FetchError;

/// Default attempt budget for the catalog fetch.
pub const DEFAULT_CATALOG_ATTEMPTS: u32 = 5;

/// Default base backoff for the catalog fetch (milliseconds).
pub const DEFAULT_CATALOG_BACKOFF_MS: u64 = 600;

/// Default attempt budget for per-species detail fetches.
pub const DEFAULT_DETAIL_ATTEMPTS: u32 = 6;

/// Default base backoff for per-species detail fetches (milliseconds).
pub const DEFAULT_DETAIL_BACKOFF_MS: u64 = 700;

/// Attempt budget and backoff schedule for a fetch.
///
/// The delay before retry `n` (1-based) is `base_backoff * n`, a linear
/// ramp rather than an exponential one: the remote's rate limiter
/// recovers on the order of seconds, and a linear schedule reaches that
/// scale without ever producing multi-minute stalls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits `base_backoff * n` before retrying.
    pub base_backoff: Duration,
}

impl FetchPolicy {
    /// Creates a policy; the attempt budget is clamped to at least 1.
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
        }
    }

    /// The generous policy used for the one-shot catalog fetch.
    pub fn catalog() -> Self {
        Self::new(
            DEFAULT_CATALOG_ATTEMPTS,
            Duration::from_millis(DEFAULT_CATALOG_BACKOFF_MS),
        )
    }

    /// The policy used for per-species detail fetches.
    pub fn detail() -> Self {
        Self::new(
            DEFAULT_DETAIL_ATTEMPTS,
            Duration::from_millis(DEFAULT_DETAIL_BACKOFF_MS),
        )
    }

    /// Delay to wait after failed attempt `attempt` (1-based), or `None`
    /// if the budget is spent and the failure is final.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt < self.max_attempts {
            Some(self.base_backoff * attempt)
        } else {
            None
        }
    }
}

/// Fetcher that retries transient failures according to a [`FetchPolicy`].
pub struct RetryingFetcher<C: AsyncHttpClient> {
    client: C,
}

impl<C: AsyncHttpClient> RetryingFetcher<C> {
    /// Wraps an HTTP client with retry behavior.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetches `url`, retrying per `policy`.
    ///
    /// Returns the raw response body on success. The body is not
    /// inspected here: a structurally invalid payload is a parse error
    /// for the caller, not a fetch failure, and is never retried.
    pub async fn fetch(&self, url: &str, policy: FetchPolicy) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.client.get(url).await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            match policy.backoff_for_attempt(attempt) {
                Some(delay) => {
                    debug!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(FetchError::Exhausted {
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
