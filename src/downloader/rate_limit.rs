//! Request-count throttling
//!
//! The upstream API tolerates short bursts only, so a load pauses before every
//! Nth request. The counter spans the whole load: first pages, continuation
//! pages and chunk boundaries all count towards the same threshold.

use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::config::{DEFAULT_PAUSE, PAUSE_EVERY};

/// Counts requests and pauses before every `every`-th one
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    every: u64,
    pause: Duration,
    issued: u64,
}

impl RequestThrottle {
    /// Create a throttle pausing for `pause` before every `every`-th request
    ///
    /// `every` of zero disables pausing.
    pub fn new(every: u64, pause: Duration) -> Self {
        Self {
            every,
            pause,
            issued: 0,
        }
    }

    /// Throttle pausing `pause` before every 5th request
    pub fn with_pause(pause: Duration) -> Self {
        Self::new(PAUSE_EVERY, pause)
    }

    /// Number of requests registered so far
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Configured pause length
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Register the next request and report whether it must be preceded by a pause
    pub fn register(&mut self) -> bool {
        self.issued += 1;
        self.every != 0 && self.issued % self.every == 0
    }

    /// Register the next request, sleeping first when it lands on the threshold
    pub async fn acquire(&mut self) {
        if self.register() {
            debug!(
                "Request {} reached the pause threshold, sleeping {:?}",
                self.issued, self.pause
            );
            sleep(self.pause).await;
        }
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::with_pause(DEFAULT_PAUSE)
    }
}
