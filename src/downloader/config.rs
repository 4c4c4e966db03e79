//! Request timing constants

use std::time::Duration;

/// Per-request timeout. A response that has not arrived within this window
/// counts as a read timeout and is eligible for retry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on establishing the TCP/TLS connection. A connect that stalls
/// past it fails without retry.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total attempts (initial request included) made for a request that keeps timing out.
pub const MAX_ATTEMPTS: u32 = 5;

/// Fixed delay between two attempts of the same request.
pub const RETRY_DELAY: Duration = Duration::from_secs(20);

/// Every Nth request of a load is preceded by a pause.
pub const PAUSE_EVERY: u64 = 5;

/// Default length of the throttle pause.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(20);

/// Default number of identifiers sent in one filter request.
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// Retry settings for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Wait between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy, clamping `max_attempts` to at least one attempt
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, RETRY_DELAY)
    }
}
