// src/session.rs
use crate::types::{Config, CspStalkerError};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{redirect, Client, ClientBuilder};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct Session {
    pub client: Client,
    csp_client: Client,
    search_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, CspStalkerError> {
        let client = Self::builder(config)?
            .build()
            .map_err(|e| CspStalkerError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        // HEAD requests read the CSP of the exact response unless redirects are enabled
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::none()
        };
        let csp_client = Self::builder(config)?
            .redirect(redirect_policy)
            .build()
            .map_err(|e| CspStalkerError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        // One cell per period, no bursting
        let search_limiter = Quota::with_period(config.search.page_delay)
            .map(|quota| Arc::new(RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN))));

        Ok(Session {
            client,
            csp_client,
            search_limiter,
        })
    }

    fn builder(config: &Config) -> Result<ClientBuilder, CspStalkerError> {
        let mut client_builder = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| CspStalkerError::ConfigError(format!("Invalid proxy URL: {}", e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        Ok(client_builder)
    }

    /// Wait until the search API may be queried again.
    pub async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.search_limiter {
            limiter.until_ready().await;
        }
    }

    pub async fn head(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, CspStalkerError> {
        self.csp_client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CspStalkerError::NetworkError(e.to_string()))
    }

    pub async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, CspStalkerError> {
        self.client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CspStalkerError::NetworkError(e.to_string()))
    }
}
