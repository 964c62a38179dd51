use crate::cli::Args;
use crate::config;
use crate::csp::{fetch_csp_domains, CspFetchOptions};
use crate::enumerator::enumerate_subdomains;
use crate::output::OutputManager;
use crate::session::Session;
use crate::sources::{default_source, Source};
use crate::types::{Config, CspStalkerError, Enumeration, RunStats, StopReason};
use crate::utils::{normalize_target, read_targets};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};

const SEPARATOR: &str = "-------------------------------------------------";

pub struct CspStalkerEngine {
    config: Config,
    session: Session,
    source: Box<dyn Source>,
    output_manager: OutputManager,
}

impl CspStalkerEngine {
    pub fn new(args: &Args) -> Result<Self, CspStalkerError> {
        let mut config = config::load_config(args.config_path.as_deref())?;

        // Override config with command line arguments
        if let Some(dir) = &args.output_dir {
            config.output.results_dir = dir.clone();
        }
        if let Some(delay) = args.delay {
            config.search.page_delay = Duration::try_from_secs_f64(delay).map_err(|e| {
                CspStalkerError::ConfigError(format!("Invalid delay of {} seconds: {}", delay, e))
            })?;
        }
        if let Some(max_pages) = args.max_pages {
            config.search.max_pages = max_pages;
        }
        if args.follow_redirects {
            config.follow_redirects = true;
        }
        if args.report_only {
            config.include_report_only = true;
        }
        config.output.silent = args.silent;

        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self, CspStalkerError> {
        let source = default_source(&config);
        Self::with_source(config, source)
    }

    pub fn with_source(config: Config, source: Box<dyn Source>) -> Result<Self, CspStalkerError> {
        let session = Session::new(&config)?;
        let output_manager = OutputManager::new(config.output.clone());

        Ok(Self {
            config,
            session,
            source,
            output_manager,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn csp_options(&self) -> CspFetchOptions {
        CspFetchOptions {
            timeout: self.config.csp_timeout,
            include_report_only: self.config.include_report_only,
        }
    }

    /// Fetch CSP apex domains, treating any fetch failure as "none found".
    pub async fn csp_domains_or_empty(&self, url: &str) -> BTreeSet<String> {
        match fetch_csp_domains(&self.session, url, &self.csp_options()).await {
            Ok(domains) => domains,
            Err(e) => {
                error!("Failed to fetch headers for {}: {}", url, e);
                BTreeSet::new()
            }
        }
    }

    pub async fn process_single_url(&self, url: &str) -> RunStats {
        let start_time = Instant::now();
        let target = normalize_target(url);
        let silent = self.config.output.silent;
        let mut stats = RunStats {
            processed_urls: vec![target.clone()],
            ..Default::default()
        };

        if !silent {
            println!("\nProcessing URL: {}", target);
        }

        let apex_domains = self.csp_domains_or_empty(&target).await;
        if apex_domains.is_empty() {
            if !silent {
                println!("No CSP domains found for {}", target);
            }
            stats.duration = start_time.elapsed();
            return stats;
        }

        info!("{}: {} apex domains referenced by CSP", target, apex_domains.len());
        for apex_domain in &apex_domains {
            if !silent {
                println!("{}", SEPARATOR);
                println!("Apex Domain: {}", apex_domain);
            }

            let enumeration = enumerate_subdomains(
                self.source.as_ref(),
                &self.session,
                apex_domain,
                self.config.search.max_pages,
            )
            .await;
            self.record_enumeration(&enumeration, &mut stats);

            if !silent {
                println!("{}", SEPARATOR);
            }
        }

        stats.apex_domains = apex_domains.len();
        stats.duration = start_time.elapsed();
        stats
    }

    fn record_enumeration(&self, enumeration: &Enumeration, stats: &mut RunStats) {
        if !enumeration.stop_reason.is_complete() {
            stats.incomplete_enumerations += 1;
            match &enumeration.stop_reason {
                StopReason::PageLimit(limit) => warn!(
                    "{}: results truncated at the {}-page limit",
                    enumeration.apex_domain, limit
                ),
                reason => warn!(
                    "{}: enumeration ended early after {} pages ({:?}), keeping partial results",
                    enumeration.apex_domain, enumeration.pages_fetched, reason
                ),
            }
        }

        if enumeration.subdomains.is_empty() {
            if !self.config.output.silent {
                println!("No subdomains found.");
            }
            return;
        }

        stats.subdomains_found += enumeration.subdomains.len();
        self.output_manager.print_subdomains(&enumeration.subdomains);

        match self
            .output_manager
            .save_results(&enumeration.apex_domain, &enumeration.subdomains)
        {
            Ok(path) => {
                stats.files_written += 1;
                if !self.config.output.silent {
                    println!("Results saved to {}", path.display());
                }
            }
            Err(e) => {
                stats.write_failures += 1;
                error!("Failed to save results for {}: {}", enumeration.apex_domain, e);
            }
        }
    }

    /// Process every non-blank line of `path` in order, one URL at a time.
    pub async fn process_url_list(&self, path: &Path) -> Result<RunStats, CspStalkerError> {
        let targets = read_targets(path).map_err(|source| CspStalkerError::InputError {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Processing {} URLs from {}", targets.len(), path.display());
        let mut stats = RunStats::default();
        for target in targets {
            stats.merge(self.process_single_url(&target).await);
        }

        Ok(stats)
    }
}
