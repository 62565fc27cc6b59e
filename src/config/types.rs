use serde::Deserialize;

/// Main configuration structure for Lot-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalog location and walk bounds
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Catalog listing URL without the page query parameter
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Name of the page-index query parameter appended to the base URL
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    /// Optional cap on the number of pages fetched in one walk.
    /// Operator override for testing; absent means walk until the
    /// catalog itself signals its end.
    #[serde(rename = "page-limit", default)]
    pub page_limit: Option<u32>,
}

/// Fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Extra attempts after a failed fetch of the same page
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts on the same page (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Per-attempt request timeout (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,

    /// Politeness delay between successive catalog pages (milliseconds)
    #[serde(rename = "page-delay-ms", default)]
    pub page_delay_ms: u64,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the HTML report is written to
    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            page_delay_ms: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
        }
    }
}

fn default_page_param() -> String {
    "apage".to_string()
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("lot-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_report_path() -> String {
    "./report.html".to_string()
}
