// src/core/scanner/target.rs

use crate::core::error::ReconError;
use crate::core::scanner::link_classifier::netloc;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::IpAddr;
use tracing::{debug, info, warn};
use url::Url;

/// The seed URL of a scan and the pieces of it the engine keeps reaching for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub url: Url,
    pub host: String,
    /// Host plus explicit port, compared against links to decide what is internal.
    pub domain: String,
    pub port: u16,
}

impl ScanTarget {
    /// Parses user input, defaulting to `https://` when no scheme is given.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        let raw = input.trim();
        let invalid = |reason: &str| ReconError::InvalidTarget {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        if raw.is_empty() {
            return Err(invalid("empty target"));
        }

        let with_scheme = if has_http_scheme(raw) {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };
        let url = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;

        let host = url
            .host_str()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
            .ok_or_else(|| invalid("no host"))?;
        let domain = netloc(&url).ok_or_else(|| invalid("no host"))?;
        let port = url.port_or_known_default().unwrap_or(443);

        Ok(Self { url, host, domain, port })
    }
}

/// Resolves a hostname to one address, preferring IPv4 the way `gethostbyname` does.
pub async fn resolve_host(host: &str) -> Result<IpAddr, ReconError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        debug!(%ip, "Target is an IP literal, skipping lookup.");
        return Ok(ip);
    }

    info!(host, "Resolving target host.");
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let failure = |reason: String| ReconError::ResolutionFailure { host: host.to_string(), reason };
    let lookup = resolver.lookup_ip(host).await.map_err(|e| {
        warn!(host, error = %e, "Host resolution failed.");
        failure(e.to_string())
    })?;

    let addresses: Vec<IpAddr> = lookup.iter().collect();
    addresses
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
        .ok_or_else(|| failure("no addresses returned".to_string()))
}

/// Whether `raw` already starts with `http://` or `https://`, in any case.
fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        raw.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
