// src/sources/mod.rs
use crate::session::Session;
use crate::types::{Config, CspStalkerError};
use async_trait::async_trait;

mod merklemap;

pub use merklemap::MerkleMapSource;

/// A paginated subdomain search backend.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one page of subdomains for `domain`. An empty page ends pagination.
    ///
    /// Non-200 responses are reported as [`CspStalkerError::UnexpectedStatus`].
    async fn fetch_page(&self, domain: &str, page: u32, session: &Session) -> Result<Vec<String>, CspStalkerError>;
}

pub fn default_source(config: &Config) -> Box<dyn Source> {
    Box::new(MerkleMapSource::new(&config.search.api_url).with_timeout(config.search.timeout))
}
