//! HTTP client for the movie metadata API
//!
//! Provides:
//! - [`ReqwestTransport`], a `reqwest` client with a fixed request timeout
//! - [`ApiHttpClient`], which attaches the API key header to every request
//!   and retries read timeouts with a fixed delay

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::downloader::config::{RetryPolicy, CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::fetcher::retry_formatter::{FailureKind, RetryContext};
use crate::fetcher::{ApiRequest, FetcherError, FetcherResult, Transport, TransportError};
use crate::query::QueryParams;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.kinopoisk.dev";

/// `reqwest`-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose requests time out after `timeout`
    ///
    /// The connect phase is bounded by [`CONNECT_TIMEOUT`] or `timeout`,
    /// whichever is shorter.
    pub fn new(timeout: Duration) -> FetcherResult<Self> {
        Self::with_timeouts(CONNECT_TIMEOUT.min(timeout), timeout)
    }

    /// Build a transport with separate connect and whole-request timeouts
    pub fn with_timeouts(connect_timeout: Duration, timeout: Duration) -> FetcherResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| FetcherError::NetworkError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

// A stalled connect also reports `is_timeout`; only response timeouts are retryable.
fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_connect() {
        TransportError::Network(err.to_string())
    } else if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(classify_reqwest_error)
    }
}

/// API client applying the retry-on-timeout policy to every request
#[derive(Debug)]
pub struct ApiHttpClient<T: Transport = ReqwestTransport> {
    transport: T,
    base_url: String,
    headers: Vec<(String, String)>,
    policy: RetryPolicy,
}

impl ApiHttpClient<ReqwestTransport> {
    /// Client with the default timeout and retry policy, authenticating with `api_key`
    pub fn with_api_key(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> FetcherResult<Self> {
        let transport = ReqwestTransport::new(REQUEST_TIMEOUT)?;
        let client = ApiHttpClient::new(transport, base_url).with_header(API_KEY_HEADER, api_key)?;
        Ok(client)
    }
}

impl<T: Transport> ApiHttpClient<T> {
    /// Create a client over `transport` with the default retry policy and no headers
    ///
    /// # Arguments
    /// * `transport` - Executes single requests
    /// * `base_url` - Base URL for endpoints (e.g., "<https://api.kinopoisk.dev>")
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: Vec::new(),
            policy: RetryPolicy::default(),
        }
    }

    /// Attach a header to every request
    ///
    /// # Errors
    /// Returns [`FetcherError::InvalidArgument`] if the name or value is not a valid header
    pub fn with_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> FetcherResult<Self> {
        let name = name.into();
        let value = value.into();

        HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FetcherError::InvalidArgument(format!("invalid header name '{name}': {e}")))?;
        HeaderValue::from_str(&value)
            .map_err(|e| FetcherError::InvalidArgument(format!("invalid value for header '{name}': {e}")))?;

        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value));
        Ok(self)
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Active retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Resolve `endpoint` and `params` into a concrete request
    pub fn build_request(&self, endpoint: &str, params: &QueryParams) -> ApiRequest {
        let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        };

        ApiRequest {
            url,
            query: params.to_pairs(),
            headers: self.headers.clone(),
        }
    }

    /// Execute a GET request and return the decoded JSON body
    ///
    /// Read timeouts are retried up to the policy's attempt count with a fixed
    /// delay in between; when the last attempt also times out its error is
    /// returned. Any other failure is logged and returned immediately.
    ///
    /// # Arguments
    /// * `endpoint` - Endpoint path (e.g., "/v1.4/movie") or absolute URL
    /// * `params` - Query parameters
    pub async fn fetch(&self, endpoint: &str, params: &QueryParams) -> FetcherResult<Value> {
        let request = self.build_request(endpoint, params);
        let max_attempts = self.policy.max_attempts;

        debug!(
            "Making GET request to: {} with {} query pairs",
            request.url,
            request.query.len()
        );

        let mut attempt = 0;
        loop {
            attempt += 1;

            let err = match self.transport.get(&request).await {
                Ok(body) => {
                    if attempt > 1 {
                        let ctx = RetryContext::new(
                            attempt,
                            max_attempts,
                            FailureKind::Timeout,
                            Duration::ZERO,
                            endpoint,
                            "",
                        );
                        info!("{}", ctx.format_success());
                    }
                    return Ok(body);
                }
                Err(err) => err,
            };

            let kind = FailureKind::classify(&err);
            error!(
                "Request error on attempt {}/{}: {}",
                attempt, max_attempts, err
            );

            let ctx = RetryContext::new(
                attempt,
                max_attempts,
                kind,
                self.policy.delay,
                endpoint,
                err.to_string(),
            );

            if !kind.is_retryable() {
                error!("{}", ctx.format_failure());
                return Err(FetcherError::from(err));
            }

            if attempt >= max_attempts {
                error!("{}", ctx.format_failure());
                return Err(match err {
                    TransportError::Timeout(message) => FetcherError::Timeout {
                        attempts: attempt,
                        message,
                    },
                    other => FetcherError::from(other),
                });
            }

            warn!("{}", ctx.format_retry());
            tokio::time::sleep(self.policy.delay).await;
        }
    }
}
