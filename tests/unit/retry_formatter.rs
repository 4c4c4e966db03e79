//! Unit tests for failure classification and retry messages

use std::time::Duration;

use movie_data_downloader::fetcher::retry_formatter::{FailureKind, RetryContext};
use movie_data_downloader::fetcher::TransportError;

fn status(code: u16) -> TransportError {
    TransportError::Status {
        status: code,
        body: String::new(),
    }
}

#[test]
fn test_only_timeouts_are_retryable() {
    let cases = [
        (TransportError::Timeout("timed out".into()), true),
        (TransportError::Network("connection reset".into()), false),
        (TransportError::Decode("eof".into()), false),
        (status(400), false),
        (status(401), false),
        (status(403), false),
        (status(404), false),
        (status(429), false),
        (status(500), false),
        (status(503), false),
    ];

    for (err, retryable) in cases {
        assert_eq!(
            FailureKind::classify(&err).is_retryable(),
            retryable,
            "{err}"
        );
    }
}

#[test]
fn test_status_classification() {
    assert_eq!(FailureKind::classify(&status(401)), FailureKind::AuthFailed(401));
    assert_eq!(FailureKind::classify(&status(429)), FailureKind::RateLimit);
    assert_eq!(FailureKind::classify(&status(404)), FailureKind::ClientError(404));
    assert_eq!(FailureKind::classify(&status(502)), FailureKind::ServerError(502));
}

#[test]
fn test_retry_message_format() {
    let ctx = RetryContext::new(
        1,
        5,
        FailureKind::Timeout,
        Duration::from_secs(20),
        "/v1.4/movie",
        "operation timed out",
    );

    assert_eq!(
        ctx.format_retry(),
        "Retrying (attempt 2/5) after read timeout - waiting 20.0 seconds... (/v1.4/movie)"
    );
}

#[test]
fn test_failure_summary_mentions_attempts_and_error() {
    let ctx = RetryContext::new(
        5,
        5,
        FailureKind::Timeout,
        Duration::from_secs(20),
        "/v1.4/person",
        "operation timed out",
    );

    let summary = ctx.format_failure();
    assert!(summary.contains("after 5 attempt(s)"));
    assert!(summary.contains("operation timed out"));
    assert!(summary.contains("/v1.4/person"));
    assert!(summary.contains("Suggestion:"));
}
