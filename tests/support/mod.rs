//! Fake API transport shared by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use movie_data_downloader::fetcher::http::ApiHttpClient;
use movie_data_downloader::fetcher::{ApiRequest, Transport, TransportError};
use serde_json::{json, Value};
use tokio::time::Instant;

pub const BASE_URL: &str = "http://api.test";

type Handler = dyn Fn(&ApiRequest, usize) -> Result<Value, TransportError> + Send + Sync;

/// One request seen by [`FakeApi`], stamped with the (virtual) time it arrived
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub at: Instant,
    pub request: ApiRequest,
}

impl RecordedCall {
    /// All values sent for `key`, in wire order
    pub fn values(&self, key: &str) -> Vec<String> {
        query_values(&self.request, key)
    }

    pub fn page(&self) -> u32 {
        self.values("page")[0].parse().unwrap()
    }
}

/// Transport answering every request through a handler closure
///
/// The handler receives the request and its zero-based call index.
pub struct FakeApi {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeApi {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest, usize) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// API serving `pages_for(first_id)` pages per chunk, one doc per id and page
    pub fn paged<F>(pages_for: F) -> Arc<Self>
    where
        F: Fn(&str) -> u32 + Send + Sync + 'static,
    {
        Self::new(move |request, _| {
            let ids = query_values(request, "id");
            let page: u32 = query_values(request, "page")[0].parse().unwrap();
            let pages = pages_for(&ids[0]);
            Ok(page_body(&ids, page, pages))
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn get(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                at: Instant::now(),
                request: request.clone(),
            });
            calls.len() - 1
        };
        (self.handler)(request, index)
    }
}

pub fn query_values(request: &ApiRequest, key: &str) -> Vec<String> {
    request
        .query
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

/// Page body with one `{"id", "page"}` doc per identifier
pub fn page_body(ids: &[String], page: u32, pages: u32) -> Value {
    let docs: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "page": page}))
        .collect();
    json!({"docs": docs, "total": docs.len(), "limit": 250, "page": page, "pages": pages})
}

pub fn timeout() -> TransportError {
    TransportError::Timeout("operation timed out".to_string())
}

pub fn client(api: &Arc<FakeApi>) -> ApiHttpClient<Arc<FakeApi>> {
    ApiHttpClient::new(Arc::clone(api), BASE_URL)
}
