//! Catalog walker - the pagination state machine
//!
//! This module drives the page-by-page walk over a catalog:
//! - Fetches pages strictly sequentially, starting at page 1
//! - Extracts lot records from each page in document order
//! - Detects the four termination signals (operator page limit, empty
//!   page, sentinel tile, unrecoverable fetch failure)
//! - Accumulates the result sequence, retained even on fatal failure

use crate::config::Config;
use crate::extract::{extract_page, LotRecord};
use crate::fetch::PageFetcher;
use crate::FetchError;
use std::fmt;
use std::time::Duration;

/// Why a walk stopped.
///
/// Only `FetchFailed` is an error; the other three are valid ways to
/// discover the end of the catalog.
#[derive(Debug)]
pub enum Termination {
    /// The catalog's placeholder tile for not-yet-revealed lots was seen
    SentinelSeen,

    /// A page came back with no content or no tile fragments
    EmptyPage,

    /// The configured page limit was hit (operator override)
    PageLimitReached,

    /// A page fetch failed after exhausting its retries
    FetchFailed(FetchError),
}

impl Termination {
    /// True only for the fetch-failure outcome
    pub fn is_fatal(&self) -> bool {
        matches!(self, Termination::FetchFailed(_))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::SentinelSeen => write!(f, "sentinel tile seen"),
            Termination::EmptyPage => write!(f, "empty page"),
            Termination::PageLimitReached => write!(f, "page limit reached"),
            Termination::FetchFailed(e) => write!(f, "fetch failed: {}", e),
        }
    }
}

/// The result of one complete walk.
///
/// `records` is meaningful for every termination, including
/// `FetchFailed`: it then holds everything harvested from pages strictly
/// before the failing one, and the caller decides whether that partial
/// result gets rendered.
#[derive(Debug)]
pub struct WalkOutcome {
    /// Harvested records in catalog document order
    pub records: Vec<LotRecord>,

    /// Number of pages for which a fetch completed
    pub pages_fetched: u32,

    /// Why the walk stopped
    pub termination: Termination,
}

/// Walks a paginated catalog from page 1 to a terminal state.
///
/// The walker owns the [`PageFetcher`] (and with it the HTTP connection
/// pool) for the duration of one walk; `walk` consumes the walker, so
/// the pool is released on every exit path.
pub struct CatalogWalker {
    fetcher: PageFetcher,
    page_limit: Option<u32>,
    page_delay: Duration,
}

impl CatalogWalker {
    /// Creates a walker from the loaded configuration
    pub fn new(config: &Config) -> crate::Result<Self> {
        let fetcher = PageFetcher::new(&config.catalog, &config.fetch)?;

        Ok(Self {
            fetcher,
            page_limit: config.catalog.page_limit,
            page_delay: Duration::from_millis(config.fetch.page_delay_ms),
        })
    }

    /// Runs the pagination loop to completion.
    ///
    /// Per iteration:
    /// 1. Stop with `PageLimitReached` if the operator limit is exceeded.
    /// 2. Fetch the page; an exhausted-retry failure stops the walk with
    ///    `FetchFailed` (no retry at this layer), a whitespace-only body
    ///    stops it with `EmptyPage`.
    /// 3. Extract tiles; a page without any stops with `EmptyPage`,
    ///    logging whether the catalog status text confirms exhaustion.
    /// 4. Append extracted records in document order; a sentinel tile
    ///    stops with `SentinelSeen`.
    pub async fn walk(self) -> WalkOutcome {
        let mut records: Vec<LotRecord> = Vec::new();
        let mut pages_fetched: u32 = 0;
        let mut page_index: u32 = 1;

        let termination = loop {
            if let Some(limit) = self.page_limit {
                if page_index > limit {
                    tracing::info!("Page limit of {} reached, stopping", limit);
                    break Termination::PageLimitReached;
                }
            }

            if pages_fetched > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            tracing::info!("Reading page {}: {}", page_index, self.fetcher.page_url(page_index));

            let markup = match self.fetcher.fetch(page_index).await {
                Ok(markup) => markup,
                Err(e) => {
                    tracing::error!("Giving up on page {}: {}", page_index, e);
                    break Termination::FetchFailed(e);
                }
            };
            pages_fetched += 1;

            if markup.trim().is_empty() {
                tracing::info!("Page {} is empty, catalog exhausted", page_index);
                break Termination::EmptyPage;
            }

            let mut extract = extract_page(&markup, self.fetcher.base_url());
            tracing::info!(
                "Page {}: {} tiles, {} records extracted",
                page_index,
                extract.tile_count,
                extract.lots.len()
            );

            records.append(&mut extract.lots);

            if extract.sentinel_seen {
                tracing::info!("Sentinel tile on page {}, remaining lots not yet posted", page_index);
                break Termination::SentinelSeen;
            }

            if extract.tile_count == 0 {
                if extract.status_confirms_exhaustion() {
                    tracing::info!("Catalog status confirms exhaustion on page {}", page_index);
                } else {
                    tracing::info!("No tiles on page {}, catalog exhausted", page_index);
                }
                break Termination::EmptyPage;
            }

            page_index += 1;
        };

        // Fetcher (and its connection pool) drops here, on every path.
        WalkOutcome {
            records,
            pages_fetched,
            termination,
        }
    }
}
