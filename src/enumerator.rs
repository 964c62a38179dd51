// src/enumerator.rs
use crate::session::Session;
use crate::sources::Source;
use crate::types::{CspStalkerError, Enumeration, StopReason};
use log::{error, info, warn};
use std::collections::BTreeSet;

/// Page through `source` for `apex_domain` until an empty page, an error or
/// `max_pages` (zero means unbounded).
///
/// Whatever was collected before the loop stopped is kept; the caller
/// inspects [`Enumeration::stop_reason`] to decide how to treat partial results.
pub async fn enumerate_subdomains(
    source: &dyn Source,
    session: &Session,
    apex_domain: &str,
    max_pages: u32,
) -> Enumeration {
    let mut collected = BTreeSet::new();
    let mut page: u32 = 0;

    let stop_reason = loop {
        if max_pages > 0 && page >= max_pages {
            warn!(
                "{}: stopping {} after {} pages (page limit reached)",
                source.name(),
                apex_domain,
                page
            );
            break StopReason::PageLimit(max_pages);
        }

        match source.fetch_page(apex_domain, page, session).await {
            Ok(domains) => {
                info!("Page {}: {} subdomains fetched.", page, domains.len());
                if domains.is_empty() {
                    break StopReason::Exhausted;
                }
                collected.extend(domains);
                page += 1;
            }
            Err(CspStalkerError::UnexpectedStatus { status, .. }) => {
                warn!(
                    "Failed to fetch subdomains for {} (Status code: {})",
                    apex_domain, status
                );
                break StopReason::HttpStatus(status);
            }
            Err(e) => {
                error!("Failed to fetch subdomains for {}: {}", apex_domain, e);
                break StopReason::Failed(e.to_string());
            }
        }
    };

    Enumeration {
        apex_domain: apex_domain.to_string(),
        subdomains: collected.into_iter().collect(),
        pages_fetched: page,
        stop_reason,
    }
}
