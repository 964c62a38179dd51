// src/csp.rs
use crate::domain::apex_domain;
use crate::session::Session;
use crate::types::CspStalkerError;
use log::debug;
use reqwest::header::{HeaderMap, CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_REPORT_ONLY};
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CspFetchOptions {
    pub timeout: Duration,
    pub include_report_only: bool,
}

impl Default for CspFetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            include_report_only: false,
        }
    }
}

/// Apex domains of every absolute `http(s)://` source expression in a policy.
pub fn parse_csp_domains(header: &str) -> BTreeSet<String> {
    let mut domains = BTreeSet::new();

    for directive in header.split(';') {
        for token in directive.split_whitespace() {
            if !(token.starts_with("http://") || token.starts_with("https://")) {
                continue;
            }

            let apex = apex_domain(token);
            if apex.is_empty() {
                debug!("Ignoring CSP source without a registrable domain: {}", token);
                continue;
            }
            domains.insert(apex);
        }
    }

    domains
}

/// Collect apex domains from the CSP headers of a response.
pub fn domains_from_headers(headers: &HeaderMap, include_report_only: bool) -> BTreeSet<String> {
    let mut names = vec![CONTENT_SECURITY_POLICY];
    if include_report_only {
        names.push(CONTENT_SECURITY_POLICY_REPORT_ONLY);
    }

    let mut domains = BTreeSet::new();
    for name in names {
        for value in headers.get_all(&name) {
            let policy = String::from_utf8_lossy(value.as_bytes());
            domains.extend(parse_csp_domains(&policy));
        }
    }

    domains
}

/// HEAD `url` and return the apex domains referenced by its CSP.
///
/// A missing header is not an error and yields an empty set.
pub async fn fetch_csp_domains(
    session: &Session,
    url: &str,
    options: &CspFetchOptions,
) -> Result<BTreeSet<String>, CspStalkerError> {
    let response = session.head(url, options.timeout).await?;
    debug!("{} answered HEAD with {}", url, response.status());
    Ok(domains_from_headers(response.headers(), options.include_report_only))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Config;
    use reqwest::header::HeaderValue;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_deduplicates_across_directives() {
        let header = "default-src https://a.example.com; script-src https://b.example.com https://a.example.com";
        assert_eq!(parse_csp_domains(header), set(&["example.com"]));
    }

    #[test]
    fn test_parse_ignores_keywords_and_schemes() {
        let header = "default-src 'self' data: blob: *.cdn.test wss://socket.example.com; img-src 'none'";
        assert!(parse_csp_domains(header).is_empty());
        assert!(parse_csp_domains("").is_empty());
    }

    #[test]
    fn test_parse_mixed_sources() {
        let header = "script-src 'self' https://www.google-analytics.com http://static.example.co.uk:8080/js/; \
                      img-src https://*.example.io https://127.0.0.1";
        assert_eq!(
            parse_csp_domains(header),
            set(&["example.co.uk", "example.io", "google-analytics.com"])
        );
    }

    #[test]
    fn test_parse_collapses_hosts_under_private_suffixes() {
        let header = "font-src https://fonts.googleapis.com https://fonts.gstatic.com; \
                      script-src https://ajax.googleapis.com https://d1234.cloudfront.net";
        assert_eq!(
            parse_csp_domains(header),
            set(&["cloudfront.net", "googleapis.com", "gstatic.com"])
        );
    }

    #[test]
    fn test_headers_with_stray_bytes_are_still_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_bytes(b"default-src https://a.example.com \xff https://b.example.org").unwrap(),
        );

        assert_eq!(domains_from_headers(&headers, false), set(&["example.com", "example.org"]));
    }

    #[test]
    fn test_headers_report_only_opt_in() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static("default-src https://a.example.com"));
        headers.insert(
            CONTENT_SECURITY_POLICY_REPORT_ONLY,
            HeaderValue::from_static("default-src https://b.example.org"),
        );

        assert_eq!(domains_from_headers(&headers, false), set(&["example.com"]));
        assert_eq!(domains_from_headers(&headers, true), set(&["example.com", "example.org"]));
    }

    #[test]
    fn test_headers_multiple_policies() {
        let mut headers = HeaderMap::new();
        headers.append(CONTENT_SECURITY_POLICY, HeaderValue::from_static("script-src https://js.example.com"));
        headers.append(CONTENT_SECURITY_POLICY, HeaderValue::from_static("img-src https://img.example.net"));

        assert_eq!(domains_from_headers(&headers, false), set(&["example.com", "example.net"]));
    }

    fn session() -> Session {
        Session::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_reads_csp_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("HEAD", "/")
            .with_status(200)
            .with_header(
                "content-security-policy",
                "default-src https://a.example.com; script-src https://b.example.com https://a.example.com",
            )
            .create_async()
            .await;

        let domains = fetch_csp_domains(&session(), &server.url(), &CspFetchOptions::default())
            .await
            .unwrap();

        assert_eq!(domains, set(&["example.com"]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_without_header_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("HEAD", "/").with_status(200).create_async().await;

        let domains = fetch_csp_domains(&session(), &server.url(), &CspFetchOptions::default())
            .await
            .unwrap();
        assert!(domains.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_does_not_follow_redirects_by_default() {
        let mut server = mockito::Server::new_async().await;
        let _redirect = server
            .mock("HEAD", "/")
            .with_status(301)
            .with_header("location", "/landing")
            .with_header("content-security-policy", "default-src https://cdn.example.com")
            .create_async()
            .await;
        let landing = server
            .mock("HEAD", "/landing")
            .with_status(200)
            .with_header("content-security-policy", "default-src https://cdn.example.org")
            .expect(0)
            .create_async()
            .await;

        let domains = fetch_csp_domains(&session(), &server.url(), &CspFetchOptions::default())
            .await
            .unwrap();

        assert_eq!(domains, set(&["example.com"]));
        landing.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_connection_failure_is_error() {
        let options = CspFetchOptions {
            timeout: Duration::from_secs(2),
            ..CspFetchOptions::default()
        };
        let result = fetch_csp_domains(&session(), "http://127.0.0.1:1/", &options).await;
        assert!(matches!(result, Err(CspStalkerError::NetworkError(_))));
    }
}
