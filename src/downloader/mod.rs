//! Request timing and throttling
//!
//! # Components
//!
//! - [`config`] - Timeout, retry and pause constants plus [`config::RetryPolicy`]
//! - [`rate_limit`] - [`rate_limit::RequestThrottle`], the every-Nth-request pause
//!
//! Both are consumed by [`crate::fetcher`]: the HTTP client applies the retry
//! policy to every request and the batch loader owns one throttle per load.

pub mod config;
pub mod rate_limit;

pub use config::RetryPolicy;
pub use rate_limit::RequestThrottle;
