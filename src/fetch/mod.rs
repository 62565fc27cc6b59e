//! HTTP page fetcher
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building an HTTP client with proper user agent and timeouts
//! - Constructing per-page catalog URLs from the base URL
//! - Bounded retry on transient failures (timeout, connection, non-2xx)
//! - Error classification

use crate::config::{CatalogConfig, FetchConfig};
use crate::{FetchError, FetchErrorKind};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches catalog pages one at a time over a shared connection pool.
///
/// The fetcher owns no state between calls beyond the reqwest [`Client`];
/// dropping the fetcher releases the pool. Retries for one page happen
/// entirely inside [`PageFetcher::fetch`]; callers never retry on top.
pub struct PageFetcher {
    client: Client,
    base_url: Url,
    page_param: String,
    max_retries: u32,
    retry_delay: Duration,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

impl PageFetcher {
    /// Creates a fetcher for one catalog.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Catalog location (base URL, page parameter name)
    /// * `fetch` - Retry, delay, and timeout settings
    pub fn new(catalog: &CatalogConfig, fetch: &FetchConfig) -> crate::Result<Self> {
        let base_url = Url::parse(&catalog.base_url)?;
        let client = build_http_client(fetch)?;

        Ok(Self {
            client,
            base_url,
            page_param: catalog.page_param.clone(),
            max_retries: fetch.max_retries,
            retry_delay: Duration::from_millis(fetch.retry_delay_ms),
        })
    }

    /// The catalog base URL, used for resolving relative lot links
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for a given 1-based page index by appending the
    /// page query parameter to the base URL.
    pub fn page_url(&self, page_index: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page_index.to_string());
        url
    }

    /// Fetches the raw markup of one catalog page.
    ///
    /// Transient failures (timeout, connection error, non-success status)
    /// are retried up to `max-retries` times with a fixed delay between
    /// attempts; every attempt uses the identical URL and headers. An
    /// empty body is a successful fetch here; the caller interprets it
    /// as the catalog's empty-content exhaustion signal.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Raw page markup (possibly empty)
    /// * `Err(FetchError)` - All attempts failed
    pub async fn fetch(&self, page_index: u32) -> Result<String, FetchError> {
        let url = self.page_url(page_index);
        let attempts = self.max_retries + 1;
        let mut attempt = 1;

        loop {
            match self.attempt(&url).await {
                Ok(body) => {
                    if attempt > 1 {
                        tracing::info!(
                            "Fetched page {} on attempt {} of {}",
                            page_index,
                            attempt,
                            attempts
                        );
                    }
                    return Ok(body);
                }
                Err(kind) => {
                    if attempt >= attempts {
                        return Err(FetchError {
                            page_index,
                            attempts,
                            kind,
                        });
                    }
                    tracing::warn!(
                        "Attempt {} of {} for page {} failed ({}), retrying in {:?}",
                        attempt,
                        attempts,
                        page_index,
                        kind,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One GET attempt, classified on failure
    async fn attempt(&self, url: &Url) -> Result<String, FetchErrorKind> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchErrorKind::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(classify_request_error)
    }
}

/// Maps a reqwest error to the transient-failure taxonomy
fn classify_request_error(e: reqwest::Error) -> FetchErrorKind {
    if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_connect() {
        FetchErrorKind::Connect
    } else {
        FetchErrorKind::Transport(e)
    }
}
