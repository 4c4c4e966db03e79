//! Paginated batch loading
//!
//! Splits an identifier list into chunks, requests every page of every chunk
//! in order and accumulates the `docs` of all pages into one list.
//!
//! Each request is built from a fresh clone of the caller's parameter
//! template with the identifier chunk and the page number laid on top. One
//! [`RequestThrottle`] spans the whole load, so the every-5th-request pause
//! counts first pages, continuation pages and chunk boundaries alike.

use std::time::Duration;

use tracing::{debug, info};

use crate::downloader::config::{DEFAULT_PAUSE, PAUSE_EVERY};
use crate::downloader::rate_limit::RequestThrottle;
use crate::fetcher::chunker::split_chunks;
use crate::fetcher::http::ApiHttpClient;
use crate::fetcher::{FetcherError, FetcherResult, Transport};
use crate::query::{ParamValue, QueryParams};
use crate::{Identifier, PageResponse, RawRecord};

/// Upper bound on pages per chunk; guards against a runaway `pages` value
const MAX_PAGES: u32 = 10_000;

/// Name of the page number parameter
pub const PAGE_PARAM: &str = "page";

/// Loads all pages for a list of identifiers
pub struct BatchLoader<'a, T: Transport> {
    client: &'a ApiHttpClient<T>,
    pause: Duration,
    pause_every: u64,
    last_request_count: u64,
}

impl<'a, T: Transport> BatchLoader<'a, T> {
    /// Loader pausing [`DEFAULT_PAUSE`] before every 5th request
    pub fn new(client: &'a ApiHttpClient<T>) -> Self {
        Self {
            client,
            pause: DEFAULT_PAUSE,
            pause_every: PAUSE_EVERY,
            last_request_count: 0,
        }
    }

    /// Override the pause length
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Number of requests issued by the most recent [`load`](Self::load)
    pub fn last_request_count(&self) -> u64 {
        self.last_request_count
    }

    /// Fetch every page for every chunk of `ids`
    ///
    /// # Arguments
    /// * `endpoint` - Endpoint path (e.g., "/v1.4/movie")
    /// * `params` - Base parameter template; left untouched
    /// * `id_param` - Parameter name receiving the identifier chunk (e.g., "id")
    /// * `ids` - All identifiers to load
    /// * `chunk_size` - Identifiers per filter request
    ///
    /// # Returns
    /// Records of all pages of all chunks, in request order
    ///
    /// # Errors
    /// Fails on an invalid chunk size or identifier parameter name, and on the
    /// first unrecoverable fetch error; records gathered so far are dropped.
    pub async fn load(
        &mut self,
        endpoint: &str,
        params: &QueryParams,
        id_param: &str,
        ids: &[Identifier],
        chunk_size: usize,
    ) -> FetcherResult<Vec<RawRecord>> {
        if id_param.trim().is_empty() {
            return Err(FetcherError::InvalidArgument(
                "identifier parameter name cannot be empty".to_string(),
            ));
        }
        if id_param == PAGE_PARAM {
            return Err(FetcherError::InvalidArgument(format!(
                "identifier parameter cannot be '{PAGE_PARAM}'"
            )));
        }

        let chunks = split_chunks(ids, chunk_size)?;
        let total_chunks = chunks.len();
        let mut throttle = RequestThrottle::new(self.pause_every, self.pause);
        let mut all_docs = Vec::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let chunk_no = index + 1;
            info!("Loading page 1 for chunk {} of {}...", chunk_no, total_chunks);

            let first_page = self
                .fetch_page(&mut throttle, endpoint, params, id_param, chunk, 1)
                .await?;
            let total_pages = first_page.pages;
            all_docs.extend(first_page.docs);

            if total_pages > MAX_PAGES {
                return Err(FetcherError::InvalidResponse(format!(
                    "chunk {chunk_no} reports {total_pages} pages, more than the {MAX_PAGES} page limit"
                )));
            }

            for page in 2..=total_pages {
                info!(
                    "Loading page {} of {} for chunk {} of {}...",
                    page, total_pages, chunk_no, total_chunks
                );
                let next_page = self
                    .fetch_page(&mut throttle, endpoint, params, id_param, chunk, page)
                    .await?;
                all_docs.extend(next_page.docs);
            }
        }

        self.last_request_count = throttle.issued();
        info!(
            "Load completed successfully: {} records in {} requests",
            all_docs.len(),
            throttle.issued()
        );
        Ok(all_docs)
    }

    async fn fetch_page(
        &self,
        throttle: &mut RequestThrottle,
        endpoint: &str,
        base: &QueryParams,
        id_param: &str,
        chunk: &[Identifier],
        page: u32,
    ) -> FetcherResult<PageResponse> {
        throttle.acquire().await;

        let params = page_params(base, id_param, chunk, page);
        let body = self.client.fetch(endpoint, &params).await?;
        let page_response = PageResponse::from_value(body).map_err(FetcherError::InvalidResponse)?;

        debug!(
            "Received {} records on page {} of {}",
            page_response.docs.len(),
            page,
            page_response.pages
        );
        Ok(page_response)
    }
}

/// Build the parameters of one page request from the base template
pub fn page_params(
    base: &QueryParams,
    id_param: &str,
    chunk: &[Identifier],
    page: u32,
) -> QueryParams {
    let mut params = base.clone();
    params.set(
        id_param,
        ParamValue::Many(chunk.iter().map(ToString::to_string).collect()),
    );
    params.set(PAGE_PARAM, page.to_string());
    params
}
