//! HTTP client abstraction for testability.
//!
//! FDSN web services are plain HTTP: GET with query parameters for the
//! federator and travel time services, POST with a text body for station
//! metadata bulk requests. Hiding the client behind a trait allows
//! dependency injection and mock-based tests without network access.

use thiserror::Error;

/// Errors returned by HTTP client implementations.
///
/// `Clone` so that mock clients can replay a canned error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HttpError {
    /// Failed to construct the underlying client.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request did not complete (connect, timeout, read).
    #[error("request failed: {0}")]
    Transport(String),
}

/// Trait for HTTP client operations.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;

    /// Performs an HTTP POST request with a plain-text body and returns the
    /// response body.
    fn post(&self, url: &str, body: &str) -> Result<Vec<u8>, HttpError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(30)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    fn read_response(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<Vec<u8>, HttpError> {
        if !response.status().is_success() {
            return Err(HttpError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| HttpError::Transport(e.to_string()))
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Self::read_response(url, response)
    }

    fn post(&self, url: &str, body: &str) -> Result<Vec<u8>, HttpError> {
        let response = self
            .client
            .post(url)
            .body(body.to_string())
            .send()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Self::read_response(url, response)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A request recorded by [`MockHttpClient`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum MockRequest {
        Get(String),
        Post(String, String),
    }

    impl MockRequest {
        /// URL of the recorded request, regardless of method.
        pub fn url(&self) -> &str {
            match self {
                MockRequest::Get(url) => url,
                MockRequest::Post(url, _) => url,
            }
        }
    }

    /// Mock HTTP client for testing.
    ///
    /// Replays queued responses in order; once the queue is drained, the
    /// fallback response is cloned for every further request. All requests
    /// are recorded for assertions.
    pub struct MockHttpClient {
        queue: Mutex<VecDeque<Result<Vec<u8>, HttpError>>>,
        fallback: Result<Vec<u8>, HttpError>,
        requests: Mutex<Vec<MockRequest>>,
    }

    impl MockHttpClient {
        /// Creates a mock whose fallback response is `response`.
        pub fn with_response(response: Result<Vec<u8>, HttpError>) -> Self {
            Self {
                queue: Mutex::new(VecDeque::new()),
                fallback: response,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Creates a mock that fails every request not covered by the queue.
        pub fn new() -> Self {
            Self::with_response(Err(HttpError::Transport(
                "no mock response queued".to_string(),
            )))
        }

        /// Queues a one-shot response, consumed before the fallback.
        pub fn push_response(&self, response: Result<Vec<u8>, HttpError>) {
            self.queue.lock().unwrap().push_back(response);
        }

        /// Returns the requests made so far, in order.
        pub fn requests(&self) -> Vec<MockRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn next_response(&self) -> Result<Vec<u8>, HttpError> {
            self.queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
            self.requests
                .lock()
                .unwrap()
                .push(MockRequest::Get(url.to_string()));
            self.next_response()
        }

        fn post(&self, url: &str, body: &str) -> Result<Vec<u8>, HttpError> {
            self.requests
                .lock()
                .unwrap()
                .push(MockRequest::Post(url.to_string(), body.to_string()));
            self.next_response()
        }
    }

    #[test]
    fn test_mock_client_fallback_response() {
        let mock = MockHttpClient::with_response(Ok(vec![1, 2, 3, 4]));

        assert_eq!(mock.get("http://example.com").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.get("http://example.com").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mock_client_queued_responses_in_order() {
        let mock = MockHttpClient::with_response(Ok(b"fallback".to_vec()));
        mock.push_response(Ok(b"first".to_vec()));
        mock.push_response(Err(HttpError::Status {
            status: 404,
            url: "http://example.com".to_string(),
        }));

        assert_eq!(mock.get("http://example.com").unwrap(), b"first".to_vec());
        assert!(mock.get("http://example.com").is_err());
        assert_eq!(
            mock.get("http://example.com").unwrap(),
            b"fallback".to_vec()
        );
    }

    #[test]
    fn test_mock_client_records_requests() {
        let mock = MockHttpClient::with_response(Ok(Vec::new()));
        mock.get("http://example.com/a").ok();
        mock.post("http://example.com/b", "line1\nline2").ok();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], MockRequest::Get("http://example.com/a".to_string()));
        assert_eq!(
            requests[1],
            MockRequest::Post("http://example.com/b".to_string(), "line1\nline2".to_string())
        );
    }
}
