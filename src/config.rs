use crate::types::{Config, CspStalkerError};
use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    http: HttpSection,
    #[serde(default)]
    search: SearchSection,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpSection {
    user_agent: Option<String>,
    proxy: Option<String>,
    csp_timeout_secs: Option<u64>,
    follow_redirects: Option<bool>,
    include_report_only: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchSection {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    page_delay_ms: Option<u64>,
    max_pages: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    results_dir: Option<PathBuf>,
}

/// Wrap a lower-level failure as a `ConfigError` prefixed with `context`.
fn config_error<E: Display>(context: String) -> impl FnOnce(E) -> CspStalkerError {
    move |e| CspStalkerError::ConfigError(format!("{}: {}", context, e))
}

/// Defaults, then the optional TOML file, then `CSPSTALKER_*` environment variables.
pub fn load_config(config_path: Option<&Path>) -> Result<Config, CspStalkerError> {
    let mut config = Config::default();

    if let Some(path) = config_path {
        let contents = fs::read_to_string(path)
            .map_err(config_error(format!("Failed to read config file {}", path.display())))?;
        let file_config: FileConfig = toml::from_str(&contents)
            .map_err(config_error(format!("Failed to parse config file {}", path.display())))?;
        apply_file_config(&mut config, file_config);
    }

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

fn apply_file_config(config: &mut Config, file: FileConfig) {
    let FileConfig { http, search, output } = file;

    if let Some(user_agent) = http.user_agent {
        config.user_agent = user_agent;
    }
    if http.proxy.is_some() {
        config.proxy = http.proxy;
    }
    if let Some(secs) = http.csp_timeout_secs {
        config.csp_timeout = Duration::from_secs(secs);
    }
    if let Some(follow) = http.follow_redirects {
        config.follow_redirects = follow;
    }
    if let Some(report_only) = http.include_report_only {
        config.include_report_only = report_only;
    }

    if let Some(api_url) = search.api_url {
        config.search.api_url = api_url;
    }
    if let Some(secs) = search.timeout_secs {
        config.search.timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = search.page_delay_ms {
        config.search.page_delay = Duration::from_millis(ms);
    }
    if let Some(max_pages) = search.max_pages {
        config.search.max_pages = max_pages;
    }

    if let Some(results_dir) = output.results_dir {
        config.output.results_dir = results_dir;
    }
}

fn apply_env_overrides(config: &mut Config) -> Result<(), CspStalkerError> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), CspStalkerError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_url) = lookup("CSPSTALKER_API_URL") {
        config.search.api_url = api_url.trim().to_string();
    }
    if let Some(dir) = lookup("CSPSTALKER_RESULTS_DIR") {
        config.output.results_dir = PathBuf::from(dir.trim());
    }
    if let Some(proxy) = lookup("CSPSTALKER_PROXY") {
        config.proxy = Some(proxy.trim().to_string());
    }
    if let Some(delay) = lookup("CSPSTALKER_PAGE_DELAY_MS") {
        let ms = delay
            .trim()
            .parse::<u64>()
            .map_err(config_error(format!("Invalid CSPSTALKER_PAGE_DELAY_MS value {:?}", delay)))?;
        config.search.page_delay = Duration::from_millis(ms);
    }
    Ok(())
}

pub fn validate_config(config: &Config) -> Result<(), CspStalkerError> {
    if config.csp_timeout.is_zero() {
        return Err(CspStalkerError::ConfigError("The CSP timeout must be greater than 0".to_string()));
    }
    if config.search.timeout.is_zero() {
        return Err(CspStalkerError::ConfigError("The search timeout must be greater than 0".to_string()));
    }

    let api_url = Url::parse(&config.search.api_url)
        .map_err(config_error(format!("Invalid search API URL {:?}", config.search.api_url)))?;
    if !matches!(api_url.scheme(), "http" | "https") {
        return Err(CspStalkerError::ConfigError(format!(
            "The search API URL must use http or https, got {}",
            api_url.scheme()
        )));
    }
    Ok(())
}
