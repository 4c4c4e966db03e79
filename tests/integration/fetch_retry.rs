//! Integration tests for fetch-with-retry
//!
//! Time is paused, so the 20 s retry delays elapse instantly and the
//! recorded call instants show the exact waits.

use std::time::Duration;

use movie_data_downloader::downloader::config::RetryPolicy;
use movie_data_downloader::fetcher::http::API_KEY_HEADER;
use movie_data_downloader::fetcher::{FetcherError, TransportError};
use movie_data_downloader::query::QueryParams;
use serde_json::json;

use crate::support::{client, timeout, FakeApi};

#[tokio::test(start_paused = true)]
async fn test_timeouts_then_success() {
    for failures in 0..5usize {
        let api = FakeApi::new(move |_, index| {
            if index < failures {
                Err(timeout())
            } else {
                Ok(json!({"docs": [], "pages": 1}))
            }
        });

        let body = client(&api)
            .fetch("/v1.4/movie", &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(body["pages"], 1);
        assert_eq!(api.call_count(), failures + 1);

        let calls = api.calls();
        for pair in calls.windows(2) {
            assert_eq!(pair[1].at - pair[0].at, Duration::from_secs(20));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_persistent_timeout_gives_up_after_five_attempts() {
    let api = FakeApi::new(|_, _| Err(timeout()));

    let err = client(&api)
        .fetch("/v1.4/movie", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetcherError::Timeout { attempts: 5, .. }));
    assert_eq!(api.call_count(), 5);

    let calls = api.calls();
    assert_eq!(calls[4].at - calls[0].at, Duration::from_secs(80));
}

#[tokio::test(start_paused = true)]
async fn test_http_errors_fail_fast() {
    for status in [400u16, 401, 403, 404, 429, 500, 502] {
        let api = FakeApi::new(move |_, _| {
            Err(TransportError::Status {
                status,
                body: "{\"message\":\"error\"}".to_string(),
            })
        });

        let err = client(&api)
            .fetch("/v1.4/movie", &QueryParams::new())
            .await
            .unwrap_err();

        match err {
            FetcherError::RequestRejected { status: got, .. } => assert_eq!(got, status),
            other => panic!("unexpected error for {status}: {other:?}"),
        }
        assert_eq!(api.call_count(), 1, "HTTP {status} must not be retried");
    }
}

#[tokio::test(start_paused = true)]
async fn test_connection_and_decode_errors_fail_fast() {
    let api = FakeApi::new(|_, _| Err(TransportError::Network("connection refused".into())));
    let err = client(&api)
        .fetch("/v1.4/movie", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetcherError::NetworkError(_)));
    assert_eq!(api.call_count(), 1);

    let api = FakeApi::new(|_, _| Err(TransportError::Decode("expected value".into())));
    let err = client(&api)
        .fetch("/v1.4/movie", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetcherError::ParseError(_)));
    assert_eq!(api.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_custom_retry_policy() {
    let api = FakeApi::new(|_, _| Err(timeout()));
    let client = client(&api).with_retry_policy(RetryPolicy::new(2, Duration::from_secs(3)));

    let err = client
        .fetch("/v1.4/movie", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetcherError::Timeout { attempts: 2, .. }));
    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].at - calls[0].at, Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_request_carries_key_and_parameters() {
    let api = FakeApi::new(|_, _| Ok(json!({"docs": [], "pages": 0})));
    let client = client(&api).with_header(API_KEY_HEADER, "TEST-KEY").unwrap();

    let params = QueryParams::new()
        .with("limit", "250")
        .with("selectFields", movie_data_downloader::query::ParamValue::many(["id", "name"]));
    client.fetch("/v1.4/movie", &params).await.unwrap();

    let calls = api.calls();
    let request = &calls[0].request;
    assert_eq!(request.url, "http://api.test/v1.4/movie");
    assert_eq!(
        request.headers,
        vec![("X-API-KEY".to_string(), "TEST-KEY".to_string())]
    );
    assert_eq!(
        request.query,
        vec![
            ("limit".to_string(), "250".to_string()),
            ("selectFields".to_string(), "id".to_string()),
            ("selectFields".to_string(), "name".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_retried_request_is_identical() {
    let api = FakeApi::new(|_, index| {
        if index == 0 {
            Err(timeout())
        } else {
            Ok(json!({"docs": [], "pages": 1}))
        }
    });

    let params = QueryParams::new().with("id", "326").with("page", "2");
    client(&api).fetch("/v1.4/movie", &params).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].request, calls[1].request);
}
