//! Report generation for harvested catalogs

mod html;

use thiserror::Error;

pub use html::{format_html_report, write_report};

/// Errors from report generation
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for report operations
pub type ReportResult<T> = std::result::Result<T, ReportError>;
