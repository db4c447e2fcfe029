//! Network fetch plumbing: HTTP client seam, retry policy, concurrency gate.
//!
//! The pieces stack in one direction: [`AsyncHttpClient`] performs a single
//! GET, [`RetryingFetcher`] wraps it with a backoff schedule, and
//! [`ConcurrencyLimiter`] bounds how many fetches are in flight at once.
//! Everything above this module sees `fetch(url) -> bytes` and nothing else.

mod http;
mod limiter;
mod retry;

use thiserror::Error;

pub use http::{AsyncHttpClient, ReqwestClient};
pub use limiter::{ConcurrencyLimiter, DEFAULT_FILL_CONCURRENCY};
pub use retry::{FetchPolicy, RetryingFetcher};

#[cfg(test)]
pub use http::tests::MockHttpClient;

/// Errors produced by the fetch stack.
///
/// `RateLimited`, `Status` and `Network` are transient single-attempt
/// failures; the retry layer turns a run of them into `Exhausted`, which
/// carries the final attempt's cause.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The remote asked us to slow down (HTTP 429).
    #[error("rate limited by {url}")]
    RateLimited {
        /// The URL that was rate limited.
        url: String,
    },

    /// Any other non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned it.
        url: String,
    },

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// Every attempt failed; `source` is the last attempt's failure.
    #[error("fetch exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last underlying failure.
        #[source]
        source: Box<FetchError>,
    },
}
