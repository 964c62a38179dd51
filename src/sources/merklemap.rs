// src/sources/merklemap.rs
use crate::session::Session;
use crate::sources::Source;
use crate::types::CspStalkerError;
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct MerkleMapResponse {
    #[serde(default)]
    results: Vec<MerkleMapEntry>,
}

#[derive(Debug, Deserialize)]
struct MerkleMapEntry {
    domain: Option<String>,
}

/// MerkleMap certificate search API
#[derive(Debug, Clone)]
pub struct MerkleMapSource {
    name: String,
    api_url: String,
    timeout: Duration,
}

impl MerkleMapSource {
    pub fn new(api_url: &str) -> Self {
        Self {
            name: "merklemap".to_string(),
            api_url: api_url.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn page_url(&self, domain: &str, page: u32) -> String {
        format!("{}?query={}&page={}", self.api_url, urlencoding::encode(domain), page)
    }
}

#[async_trait]
impl Source for MerkleMapSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_page(&self, domain: &str, page: u32, session: &Session) -> Result<Vec<String>, CspStalkerError> {
        session.wait_for_rate_limit().await;

        let url = self.page_url(domain, page);
        let response = session.get(&url, self.timeout).await.map_err(|e| CspStalkerError::SourceError {
            source_name: self.name.to_string(),
            message: format!("HTTP request failed: {}", e),
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CspStalkerError::UnexpectedStatus {
                source_name: self.name.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;

        let parsed: MerkleMapResponse = serde_json::from_str(&text)
            .map_err(|e| CspStalkerError::JsonParseError(e.to_string(), text))?;

        let total = parsed.results.len();
        let domains: Vec<String> = parsed.results
            .into_iter()
            .filter_map(|entry| entry.domain)
            .collect();

        if domains.len() != total {
            debug!("[{}] Skipped {} results without a domain field", self.name, total - domains.len());
        }

        Ok(domains)
    }
}
