//! Failure classification and retry message formatting.
//!
//! Every failed attempt is first mapped to a [`FailureKind`]; the retry loop
//! only consults [`FailureKind::is_retryable`], so the policy does not depend
//! on which transport produced the error.

use std::time::Duration;

use super::TransportError;

/// Classification of a failed request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Response did not arrive within the request timeout
    Timeout,
    /// HTTP 401/403, usually a missing or wrong API key
    AuthFailed(u16),
    /// HTTP 429
    RateLimit,
    /// Other 4xx statuses
    ClientError(u16),
    /// 5xx statuses
    ServerError(u16),
    /// Connection refused, DNS failure or reset
    Network,
    /// Body could not be decoded
    Decode,
}

impl FailureKind {
    /// Classify a transport failure.
    pub fn classify(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout(_) => FailureKind::Timeout,
            TransportError::Status { status, .. } => match *status {
                401 | 403 => FailureKind::AuthFailed(*status),
                429 => FailureKind::RateLimit,
                s if (500..600).contains(&s) => FailureKind::ServerError(s),
                s => FailureKind::ClientError(s),
            },
            TransportError::Network(_) => FailureKind::Network,
            TransportError::Decode(_) => FailureKind::Decode,
        }
    }

    /// Only read timeouts are retried; everything else fails fast.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Timeout)
    }

    /// User-friendly description used inside log messages.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Timeout => "read timeout",
            Self::AuthFailed(_) => "authentication failed",
            Self::RateLimit => "rate limit exceeded",
            Self::ClientError(code) => match code {
                400 => "invalid request",
                404 => "resource not found",
                _ => "client error",
            },
            Self::ServerError(code) => match code {
                500 => "internal server error",
                502 => "bad gateway",
                503 => "service unavailable",
                504 => "gateway timeout",
                _ => "server error",
            },
            Self::Network => "connection failed",
            Self::Decode => "malformed response body",
        }
    }

    /// Suggested remediation shown with the final failure.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Timeout => "The API is slow to respond; try a smaller --chunk-size or a longer --timeout-secs",
            Self::AuthFailed(_) => "Verify the API key passed via --api-key or KINOPOISK_API_KEY",
            Self::RateLimit => "Daily request quota may be exhausted; increase --pause-secs or wait",
            Self::ClientError(_) => "Review preset parameters and the --params-file overrides",
            Self::ServerError(_) => "The API may be experiencing issues, try again later",
            Self::Network => "Verify internet connectivity, DNS resolution and --base-url",
            Self::Decode => "Check that --base-url points at the JSON API",
        }
    }
}

/// Context for formatting retry messages.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Current attempt number (1-based)
    pub attempt: u32,
    /// Maximum number of attempts configured
    pub max_attempts: u32,
    /// Classified failure of the current attempt
    pub kind: FailureKind,
    /// Wait before the next attempt
    pub delay: Duration,
    /// Endpoint that failed
    pub endpoint: String,
    /// Original error message
    pub error_message: String,
}

impl RetryContext {
    /// Convenience constructor used by the retry loop.
    pub fn new(
        attempt: u32,
        max_attempts: u32,
        kind: FailureKind,
        delay: Duration,
        endpoint: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            attempt,
            max_attempts,
            kind,
            delay,
            endpoint: endpoint.into(),
            error_message: error_message.into(),
        }
    }

    /// Format the message logged before waiting for the next attempt.
    pub fn format_retry(&self) -> String {
        format!(
            "Retrying (attempt {}/{}) after {} - waiting {:.1} seconds... ({})",
            self.attempt + 1,
            self.max_attempts,
            self.kind.description(),
            self.delay.as_secs_f64(),
            self.endpoint
        )
    }

    /// Format the message logged when a retried request finally succeeds.
    pub fn format_success(&self) -> String {
        format!(
            "Attempt {}/{} succeeded ({})",
            self.attempt, self.max_attempts, self.endpoint
        )
    }

    /// Format the final failure summary.
    pub fn format_failure(&self) -> String {
        [
            format!("[FAILED] Request failed after {} attempt(s)", self.attempt),
            format!("  Last error: {}", self.error_message),
            format!("  Endpoint: {}", self.endpoint),
            format!("  Suggestion: {}", self.kind.suggestion()),
        ]
        .join("\n")
    }
}
