//! Lot-Harvest: an incremental auction catalog harvester
//!
//! This crate walks a paginated online auction catalog page by page,
//! extracts one record per lot tile, and renders the collected records
//! into a static HTML report.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod walker;

use thiserror::Error;

/// Main error type for Lot-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// A page fetch that failed after exhausting its retry budget.
///
/// Retries happen inside [`fetch::PageFetcher`]; by the time this error
/// reaches the walker it is fatal for the walk.
#[derive(Debug, Error)]
#[error("failed to fetch catalog page {page_index} after {attempts} attempt(s): {kind}")]
pub struct FetchError {
    /// 1-based index of the page that could not be fetched
    pub page_index: u32,

    /// Total attempts made (initial try plus retries)
    pub attempts: u32,

    /// The failure observed on the final attempt
    pub kind: FetchErrorKind,
}

/// Classification of the final failed fetch attempt
#[derive(Debug, Error)]
pub enum FetchErrorKind {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed")]
    Connect,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type alias for Lot-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::LotRecord;
pub use walker::{CatalogWalker, Termination, WalkOutcome};
