use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "cspstalker",
    version,
    long_version = crate::LONG_VERSION,
    about = "Extract apex domains and subdomains from CSP headers",
    long_about = "CSPStalker reads the Content-Security-Policy header of a URL, reduces every referenced host to its apex domain\nand enumerates subdomains of each apex through the MerkleMap search API."
)]
pub struct Args {
    /// Single URL to process
    #[arg(short = 'u', long = "url", value_name = "URL", conflicts_with = "file")]
    pub url: Option<String>,

    /// File containing a list of URLs to process
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory for result files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Seconds to wait between search API page requests
    #[arg(long = "delay", value_name = "SECONDS")]
    pub delay: Option<f64>,

    /// Maximum pages fetched per apex domain (0 = unlimited)
    #[arg(long = "max-pages", value_name = "N")]
    pub max_pages: Option<u32>,

    /// Follow redirects when fetching CSP headers
    #[arg(long = "follow-redirects")]
    pub follow_redirects: bool,

    /// Also read Content-Security-Policy-Report-Only
    #[arg(long = "report-only")]
    pub report_only: bool,

    /// Silent mode (only output subdomains)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose mode
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
}

impl Args {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.silent {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}
