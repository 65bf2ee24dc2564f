//! Rate-limited HTTP fetcher shared by all provider adapters
//!
//! Every request first takes a permit from the [`ProviderRateLimiter`].
//! A 429 answer is retried exactly once after a fixed delay; a second 429
//! surfaces as [`ProviderError::RateLimited`]. The retry takes a high
//! priority permit, so it waits out the provider's shorter interval.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::rate_limit::{ProviderRateLimiter, RequestPriority};
use crate::domain::ProviderSource;
use crate::ports::ProviderError;

/// Default per-call timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default delay before retrying a rate-limited request
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Configuration for the HttpFetcher
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Per-call timeout
    pub timeout: Duration,
    /// Fixed delay before the single 429 retry
    pub retry_delay: Duration,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// One GET request against a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub source: ProviderSource,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl ProviderRequest {
    pub fn get(source: ProviderSource, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }
}

/// HTTP client wrapper that applies rate limiting and the 429 retry
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    limiter: Arc<ProviderRateLimiter>,
    config: HttpFetcherConfig,
}

impl HttpFetcher {
    /// Create a new fetcher sharing the given limiter
    pub fn new(limiter: Arc<ProviderRateLimiter>, config: HttpFetcherConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, limiter, config })
    }

    /// Fetch and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, request: &ProviderRequest) -> Result<T, ProviderError> {
        let response = self.send_with_retry(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(format!("{} response: {}", request.source, e)))
    }

    async fn send_with_retry(&self, request: &ProviderRequest) -> Result<reqwest::Response, ProviderError> {
        let response = self.send_once(request, RequestPriority::Normal).await?;
        if response.status() != StatusCode::TOO_MANY_REQUESTS {
            return Self::check_status(response);
        }

        tracing::warn!(
            "Rate limited (429) by {}, retrying once in {:?}",
            request.source,
            self.config.retry_delay
        );
        tokio::time::sleep(self.config.retry_delay).await;

        let response = self.send_once(request, RequestPriority::High).await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited(request.source));
        }
        Self::check_status(response)
    }

    async fn send_once(
        &self,
        request: &ProviderRequest,
        priority: RequestPriority,
    ) -> Result<reqwest::Response, ProviderError> {
        self.limiter.acquire(request.source, priority).await;

        let mut req = self.http.get(&request.url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        req.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.config.timeout.as_millis() as u64)
            } else {
                ProviderError::Http(e)
            }
        })
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ProviderError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}
