//! Chunked, paginated fetching from the movie metadata API
//!
//! - [`chunker`] splits identifier lists into fixed-size chunks
//! - [`http`] issues single GET requests with retry on read timeout
//! - [`pagination`] drives the client over every page of every chunk
//! - [`retry_formatter`] classifies failures and formats retry log lines

use async_trait::async_trait;
use serde_json::Value;

pub mod chunker;
pub mod http;
pub mod pagination;
pub mod retry_formatter;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Every attempt ended in a read timeout
    #[error("request timed out after {attempts} attempt(s): {message}")]
    Timeout {
        /// Attempts made before giving up
        attempts: u32,
        /// Message of the last timeout
        message: String,
    },

    /// Non-success HTTP status; never retried
    #[error("request rejected with HTTP {status}: {message}")]
    RequestRejected {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Connection-level failure other than a timeout
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response body could not be decoded as JSON
    #[error("parse error: {0}")]
    ParseError(String),

    /// Decoded body lacks the expected page structure
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Caller supplied an unusable argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// One outgoing GET request, fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Absolute URL without query string
    pub url: String,
    /// Query pairs in wire order
    pub query: Vec<(String, String)>,
    /// Headers attached to the request
    pub headers: Vec<(String, String)>,
}

/// Failure reported by a [`Transport`]
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// No response within the request timeout
    #[error("read timeout: {0}")]
    Timeout(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Connection failure (DNS, refused, reset, connect timeout)
    #[error("connection error: {0}")]
    Network(String),

    /// Body was not valid JSON
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<TransportError> for FetcherError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(message) => FetcherError::Timeout {
                attempts: 1,
                message,
            },
            TransportError::Status { status, body } => FetcherError::RequestRejected {
                status,
                message: body,
            },
            TransportError::Network(message) => FetcherError::NetworkError(message),
            TransportError::Decode(message) => FetcherError::ParseError(message),
        }
    }
}

/// The HTTP seam: executes one GET request and decodes the JSON body
///
/// [`http::ReqwestTransport`] is the production implementation; tests plug
/// in scripted transports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` once, without any retry
    async fn get(&self, request: &ApiRequest) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        (**self).get(request).await
    }
}
