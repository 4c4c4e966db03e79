//! Integration tests for the every-5th-request pause

use std::time::Duration;

use movie_data_downloader::downloader::rate_limit::RequestThrottle;
use movie_data_downloader::fetcher::pagination::BatchLoader;
use movie_data_downloader::query::QueryParams;
use movie_data_downloader::Identifier;
use tokio::time::Instant;

use crate::support::{client, FakeApi};

fn ids(count: i64) -> Vec<Identifier> {
    (1..=count).map(Identifier::Numeric).collect()
}

/// Gap before each call, relative to the previous call (or `start` for the first)
fn gaps(start: Instant, calls: &[crate::support::RecordedCall]) -> Vec<Duration> {
    let mut previous = start;
    calls
        .iter()
        .map(|call| {
            let gap = call.at - previous;
            previous = call.at;
            gap
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_pause_before_fifth_and_tenth_request() {
    let api = FakeApi::paged(|_| 1);
    let client = client(&api);
    let mut loader = BatchLoader::new(&client).with_pause(Duration::from_secs(20));

    let start = Instant::now();
    loader
        .load("/v1.4/movie", &QueryParams::new(), "id", &ids(11), 1)
        .await
        .unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 11);

    for (index, gap) in gaps(start, &calls).into_iter().enumerate() {
        let request_no = index + 1;
        let expected = if request_no == 5 || request_no == 10 {
            Duration::from_secs(20)
        } else {
            Duration::ZERO
        };
        assert_eq!(gap, expected, "gap before request {request_no}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_counter_spans_chunks_and_pages() {
    // 3 chunks x 3 pages = 9 requests, pauses before the 5th only
    let api = FakeApi::paged(|_| 3);
    let client = client(&api);
    let mut loader = BatchLoader::new(&client).with_pause(Duration::from_secs(7));

    let start = Instant::now();
    loader
        .load("/v1.4/movie", &QueryParams::new(), "id", &ids(6), 2)
        .await
        .unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 9);

    // request 5 is page 2 of the second chunk
    assert_eq!(calls[4].page(), 2);
    assert_eq!(calls[4].values("id"), vec!["3", "4"]);

    let gaps = gaps(start, &calls);
    assert_eq!(gaps[4], Duration::from_secs(7));
    assert_eq!(gaps.iter().sum::<Duration>(), Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_counter_is_scoped_to_one_load() {
    let api = FakeApi::paged(|_| 1);
    let client = client(&api);
    let mut loader = BatchLoader::new(&client).with_pause(Duration::from_secs(20));

    let start = Instant::now();
    for _ in 0..2 {
        loader
            .load("/v1.4/movie", &QueryParams::new(), "id", &ids(4), 1)
            .await
            .unwrap();
        assert_eq!(loader.last_request_count(), 4);
    }

    assert_eq!(api.call_count(), 8);
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_zero_pause_never_sleeps() {
    let api = FakeApi::paged(|_| 1);
    let client = client(&api);
    let mut loader = BatchLoader::new(&client).with_pause(Duration::ZERO);

    let start = Instant::now();
    loader
        .load("/v1.4/movie", &QueryParams::new(), "id", &ids(12), 1)
        .await
        .unwrap();

    assert_eq!(api.call_count(), 12);
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_acquire_timing() {
    let mut throttle = RequestThrottle::new(5, Duration::from_secs(20));
    let start = Instant::now();

    for _ in 0..4 {
        throttle.acquire().await;
    }
    assert_eq!(Instant::now() - start, Duration::ZERO);

    throttle.acquire().await;
    assert_eq!(Instant::now() - start, Duration::from_secs(20));
    assert_eq!(throttle.issued(), 5);
}
