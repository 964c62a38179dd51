// src/domain.rs
//! Apex (registrable) domain extraction backed by the public suffix list.

use std::net::IpAddr;
use url::Url;

/// Extract the lowercase host from a URL or a bare `host[:port][/path]` string.
///
/// Leading `*.` wildcard labels, IPv6 brackets and trailing dots are removed.
pub fn host_from_input(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let host = match trimmed.split_once("://") {
        Some((_, rest)) => match Url::parse(trimmed) {
            Ok(url) => url.host_str().map(str::to_string),
            Err(_) => authority_host(rest),
        },
        None => authority_host(trimmed),
    }?;

    let host = host
        .trim_start_matches("*.")
        .trim_end_matches('.')
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_lowercase();

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

fn authority_host(rest: &str) -> Option<String> {
    let authority = rest.split(&['/', '?', '#'][..]).next()?;
    let authority = authority
        .rsplit_once('@')
        .map(|(_, host)| host)
        .unwrap_or(authority);

    if let Some(literal) = authority.strip_prefix('[') {
        return literal.split(']').next().map(str::to_string);
    }

    let host = match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    };
    Some(host.to_string())
}

/// ICANN public suffix of `host`, skipping private entries such as
/// `github.io` or `cloudfront.net`.
fn icann_suffix(host: &str) -> Option<String> {
    let mut candidate = host.to_string();
    loop {
        let suffix = psl::suffix(candidate.as_bytes())?;
        let text = std::str::from_utf8(suffix.as_bytes()).ok()?.to_string();
        match suffix.typ() {
            Some(psl::Type::Icann) => return Some(text),
            Some(psl::Type::Private) => {
                // Re-match what remains once the private entry's first label is dropped
                let (_, rest) = text.split_once('.')?;
                candidate = rest.to_string();
            }
            None => return None,
        }
    }
}

/// Reduce a URL or hostname to its apex domain, e.g. `a.b.example.co.uk` to
/// `example.co.uk` or `fonts.googleapis.com` to `googleapis.com`.
///
/// Only ICANN suffixes count. Never fails: IP literals, single labels, bare
/// public suffixes and hosts under an unknown suffix all yield an empty string.
pub fn apex_domain(input: &str) -> String {
    let host = match host_from_input(input) {
        Some(host) => host,
        None => return String::new(),
    };

    if host.parse::<IpAddr>().is_ok() || !host.contains('.') {
        return String::new();
    }

    let suffix = match icann_suffix(&host) {
        Some(suffix) => suffix,
        None => return String::new(),
    };

    let label = host
        .strip_suffix(suffix.as_str())
        .and_then(|rest| rest.strip_suffix('.'))
        .and_then(|rest| rest.rsplit('.').next())
        .filter(|label| !label.is_empty());

    match label {
        Some(label) => format!("{}.{}", label, suffix),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apex_from_hostnames() {
        assert_eq!(apex_domain("example.com"), "example.com");
        assert_eq!(apex_domain("a.b.example.com"), "example.com");
        assert_eq!(apex_domain("mail.example.co.uk"), "example.co.uk");
        assert_eq!(apex_domain("api.company.com.au"), "company.com.au");
        assert_eq!(apex_domain("CDN.Example.COM"), "example.com");
        assert_eq!(apex_domain("www.example.com."), "example.com");
    }

    #[test]
    fn test_apex_from_urls() {
        assert_eq!(apex_domain("https://cdn.example.com/lib.js"), "example.com");
        assert_eq!(apex_domain("http://static.example.org:8080"), "example.org");
        assert_eq!(apex_domain("https://*.example.net"), "example.net");
        assert_eq!(apex_domain("https://user:pw@login.example.com/"), "example.com");
        assert_eq!(apex_domain("fonts.example.com:443/css"), "example.com");
    }

    #[test]
    fn test_apex_ignores_private_suffix_entries() {
        assert_eq!(apex_domain("fonts.googleapis.com"), "googleapis.com");
        assert_eq!(apex_domain("https://ajax.googleapis.com/ajax/libs/"), "googleapis.com");
        assert_eq!(apex_domain("x.cloudfront.net"), "cloudfront.net");
        assert_eq!(apex_domain("d1234.cloudfront.net"), "cloudfront.net");
        assert_eq!(apex_domain("user.github.io"), "github.io");
        assert_eq!(apex_domain("bucket.s3.amazonaws.com"), "amazonaws.com");
        assert_eq!(apex_domain("app.herokuapp.com"), "herokuapp.com");
        assert_eq!(apex_domain("x.blogspot.com"), "blogspot.com");
        assert_eq!(apex_domain("github.io"), "github.io");
    }

    #[test]
    fn test_apex_degenerate_inputs_are_empty() {
        assert_eq!(apex_domain(""), "");
        assert_eq!(apex_domain("   "), "");
        assert_eq!(apex_domain("localhost"), "");
        assert_eq!(apex_domain("com"), "");
        assert_eq!(apex_domain("co.uk"), "");
        assert_eq!(apex_domain("127.0.0.1"), "");
        assert_eq!(apex_domain("https://[::1]:8080/"), "");
        assert_eq!(apex_domain("https://"), "");
        assert_eq!(apex_domain("host.zz"), "");
    }

    #[test]
    fn test_apex_is_idempotent() {
        let inputs = [
            "example.com",
            "a.b.example.com",
            "deep.nested.sub.example.co.uk",
            "fonts.googleapis.com",
            "user.github.io",
            "https://cdn.example.org/x?y=1",
            "http://10.0.0.1",
            "localhost",
            "",
        ];

        for input in inputs {
            let once = apex_domain(input);
            assert_eq!(apex_domain(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_host_from_input() {
        assert_eq!(host_from_input("https://a.example.com/p"), Some("a.example.com".to_string()));
        assert_eq!(host_from_input("a.example.com:8443"), Some("a.example.com".to_string()));
        assert_eq!(host_from_input("[::1]:80"), Some("::1".to_string()));
        assert_eq!(host_from_input(""), None);
    }
}
