//! HTTP client abstraction for testability.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::FetchError;

/// Default timeout for a single HTTP request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for HTTP GET operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. A single call maps to a single
/// network request; retry behavior lives one layer up.
///
/// Non-success statuses are surfaced as errors so the retry layer can
/// distinguish rate limiting from other failures without inspecting the
/// response itself.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>>;
}

/// Shared clients are clients: callers can keep a handle to a client
/// they hand to the fetch stack.
impl<T: AsyncHttpClient + ?Sized> AsyncHttpClient for std::sync::Arc<T> {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>> {
        (**self).get(url)
    }
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>> {
        let client = self.client.clone();
        let url = url.to_string();
        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(FetchError::RateLimited { url });
            }
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url,
                });
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| FetchError::Network(e.to_string()))
        })
    }
}

#[cfg(test)]
pub mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Mock HTTP client for testing.
    ///
    /// Responses can be scripted two ways: a wildcard sequence consumed
    /// by any request in call order, and per-URL queues (added with
    /// [`MockHttpClient::with_route`]) consulted first. Per-URL routing
    /// keeps tests deterministic when requests run concurrently and
    /// their completion order is not fixed. Every requested URL is
    /// recorded.
    pub struct MockHttpClient {
        wildcard: Mutex<VecDeque<Result<Vec<u8>, FetchError>>>,
        routes: Mutex<std::collections::HashMap<String, VecDeque<Result<Vec<u8>, FetchError>>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        /// Creates a mock that returns the given responses in order,
        /// regardless of URL.
        pub fn new(responses: Vec<Result<Vec<u8>, FetchError>>) -> Self {
            Self {
                wildcard: Mutex::new(responses.into()),
                routes: Mutex::new(std::collections::HashMap::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Creates a mock that fails every request with the given error.
        pub fn always_failing(error: FetchError, times: usize) -> Self {
            Self::new(vec![Err(error); times])
        }

        /// Scripts responses for one specific URL; requests for it are
        /// served from this queue before the wildcard sequence.
        pub fn with_route(
            self,
            url: impl Into<String>,
            responses: Vec<Result<Vec<u8>, FetchError>>,
        ) -> Self {
            self.routes.lock().unwrap().insert(url.into(), responses.into());
            self
        }

        /// URLs requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        /// Number of `get` calls made so far.
        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl AsyncHttpClient for MockHttpClient {
        fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, FetchError>> {
            self.requests.lock().unwrap().push(url.to_string());
            let routed = self
                .routes
                .lock()
                .unwrap()
                .get_mut(url)
                .and_then(|queue| queue.pop_front());
            let response = routed
                .or_else(|| self.wildcard.lock().unwrap().pop_front())
                .unwrap_or_else(|| panic!("mock exhausted, unexpected request for {url}"));
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient::new(vec![Ok(vec![1, 2, 3, 4])]);

        let result = mock.get("http://example.com").await;
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.requests(), vec!["http://example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient::new(vec![Err(FetchError::Network("boom".to_string()))]);

        let result = mock.get("http://example.com").await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_mock_client_sequence() {
        let mock = MockHttpClient::new(vec![
            Err(FetchError::RateLimited {
                url: "u".to_string(),
            }),
            Ok(vec![7]),
        ]);

        assert!(mock.get("u").await.is_err());
        assert_eq!(mock.get("u").await.unwrap(), vec![7]);
        assert_eq!(mock.request_count(), 2);
    }
}
