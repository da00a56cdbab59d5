//! HTTP GET with bounded retries and a per-attempt timeout
//!
//! Every failure kind (timeout, non-2xx status, transport error, malformed
//! JSON) is retried the same way: a fixed delay, then another attempt, until
//! the attempt budget is spent.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of attempts per request
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default timeout for a single attempt (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between attempts (2 seconds)
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Errors that can occur when fetching from the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The attempt did not complete before the timeout elapsed
    #[error("Timeout after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request failed at the transport level
    #[error("Network error: {0}")]
    Network(String),

    /// The body of a successful response was not valid JSON for the expected type
    #[error("Failed to parse JSON response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

/// Retry and timeout settings for [`RetryingFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Time allowed for one attempt, from sending the request to parsing the body
    pub timeout: Duration,
    /// Fixed pause before every attempt except the first
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Performs JSON GET requests with retries and a timeout race
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    client: Client,
    config: FetchConfig,
}

impl Default for RetryingFetcher {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl RetryingFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new(config: FetchConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a fetcher around an existing HTTP client
    pub fn with_client(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Retry and timeout settings in use
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch `url` and decode the JSON body into `T`
    ///
    /// Makes up to `max_attempts` attempts (at least one), sleeping
    /// `retry_delay` between them. Returns the first success, or the failure
    /// of the last attempt unchanged.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_once(url).await {
                Ok(data) => {
                    if attempt > 1 {
                        debug!(url, attempt, "fetch succeeded after retry");
                    }
                    return Ok(data);
                }
                Err(err) if attempt >= max_attempts => {
                    warn!(url, attempt, max_attempts, error = %err, "giving up on fetch");
                    return Err(err);
                }
                Err(err) => {
                    warn!(url, attempt, max_attempts, error = %err, "fetch attempt failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    /// Single attempt raced against the configured timeout
    pub async fn fetch_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.fetch_once_with_status(url).await.map(|(_, data)| data)
    }

    /// Single attempt that also reports the 2xx status the backend answered with
    pub async fn fetch_once_with_status<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<(u16, T), FetchError> {
        let request = async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Http {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            let bytes = response.bytes().await?;
            let data = serde_json::from_slice::<T>(&bytes)
                .map_err(|e| FetchError::Parse(e.to_string()))?;
            Ok::<(u16, T), FetchError>((status.as_u16(), data))
        };

        match tokio::time::timeout(self.config.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                timeout: self.config.timeout,
            }),
        }
    }
}
