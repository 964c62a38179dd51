// src/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.merklemap.com/search";

#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub proxy: Option<String>,
    pub csp_timeout: Duration,
    pub follow_redirects: bool,
    pub include_report_only: bool,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: format!("CSPStalker/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            csp_timeout: Duration::from_secs(10),
            follow_redirects: false,
            include_report_only: false,
            search: SearchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_url: String,
    pub timeout: Duration,
    /// Minimum spacing between two page requests. Zero disables rate limiting.
    pub page_delay: Duration,
    /// Upper bound on pages fetched per apex domain. Zero means unbounded.
    pub max_pages: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(15),
            page_delay: Duration::from_secs(1),
            max_pages: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub results_dir: PathBuf,
    pub silent: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            silent: false,
        }
    }
}

/// On-disk shape of `results/<apex>_results.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub apex_domain: String,
    pub subdomains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The API returned an empty page.
    Exhausted,
    HttpStatus(u16),
    Failed(String),
    PageLimit(u32),
}

impl StopReason {
    pub fn is_complete(&self) -> bool {
        matches!(self, StopReason::Exhausted)
    }
}

#[derive(Debug, Clone)]
pub struct Enumeration {
    pub apex_domain: String,
    pub subdomains: Vec<String>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub processed_urls: Vec<String>,
    pub apex_domains: usize,
    pub subdomains_found: usize,
    pub files_written: usize,
    pub write_failures: usize,
    /// Apex domains whose pagination stopped before an empty page.
    pub incomplete_enumerations: usize,
    pub duration: Duration,
}

impl RunStats {
    pub fn merge(&mut self, other: RunStats) {
        self.processed_urls.extend(other.processed_urls);
        self.apex_domains += other.apex_domains;
        self.subdomains_found += other.subdomains_found;
        self.files_written += other.files_written;
        self.write_failures += other.write_failures;
        self.incomplete_enumerations += other.incomplete_enumerations;
        self.duration += other.duration;
    }
}

#[derive(Debug, Error)]
pub enum CspStalkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Source error in {source_name}: {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    #[error("{source_name} returned HTTP status {status}")]
    UnexpectedStatus {
        source_name: String,
        status: u16,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}\nBody: {1}")]
    JsonParseError(String, String),

    #[error("Failed to read input file {}: {source}", path.display())]
    InputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output error: {0}")]
    OutputError(String),
}
