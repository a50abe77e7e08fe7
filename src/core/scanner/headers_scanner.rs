// src/core/scanner/headers_scanner.rs

use crate::core::models::{HeaderAudit, HeaderPresence, ProxyVerdict, ServerFingerprint};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Security headers whose presence is audited, in canonical casing.
pub const AUDITED_HEADERS: &[&str] = &[
    "Strict-Transport-Security",
    "Content-Security-Policy",
    "X-Frame-Options",
    "X-Content-Type-Options",
];

/// Headers that betray an intermediary, in the order they are reported as evidence.
const PROXY_HEADERS: &[&str] = &["Via", "X-Forwarded-For", "CF-Ray", "Forwarded"];

static RE_OS_HINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").unwrap());
static RE_PAREN_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*?\)").unwrap());

/// Audits a response's header map.
///
/// All lookups are case-insensitive: keys are lowercased once up front, so the
/// same headers under different casings always produce identical output.
pub fn audit_headers(
    headers: &BTreeMap<String, String>,
) -> (HeaderAudit, ProxyVerdict, ServerFingerprint) {
    let normalized: BTreeMap<String, &str> = headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.as_str()))
        .collect();
    let lookup = |name: &str| normalized.get(&name.to_ascii_lowercase()).copied();

    let audit = AUDITED_HEADERS
        .iter()
        .map(|&name| {
            let presence = match lookup(name) {
                Some(value) => HeaderPresence::Present(value.to_string()),
                None => {
                    debug!(header_name = name, "Header not found.");
                    HeaderPresence::Missing
                }
            };
            (name.to_string(), presence)
        })
        .collect();

    let server = lookup("server");
    (audit, detect_proxy(&lookup, server), fingerprint_server(server))
}

fn detect_proxy<'a>(lookup: &impl Fn(&str) -> Option<&'a str>, server: Option<&str>) -> ProxyVerdict {
    let mut evidence: Vec<String> = PROXY_HEADERS
        .iter()
        .filter(|&&name| lookup(name).is_some())
        .map(|name| name.to_string())
        .collect();

    let cloudflare = server.is_some_and(|s| s.to_ascii_lowercase().contains("cloudflare"));
    if evidence.is_empty() && cloudflare {
        evidence.push("WAF".to_string());
    }

    ProxyVerdict { detected: !evidence.is_empty(), evidence }
}

fn fingerprint_server(server: Option<&str>) -> ServerFingerprint {
    let Some(server) = server else {
        return ServerFingerprint {
            software_name: "Unknown".to_string(),
            os_hint: "Hidden".to_string(),
        };
    };

    let os_hint = RE_OS_HINT
        .captures(server)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Hidden".to_string());

    let software = RE_PAREN_GROUP.replace_all(server, "");
    let software_name = match software.trim() {
        "" => "Unknown".to_string(),
        s => s.to_string(),
    };

    ServerFingerprint { software_name, os_hint }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_header_audit_is_case_insensitive() {
        let mixed = audit_headers(&headers(&[("Strict-Transport-Security", "max-age=31536000")]));
        let upper = audit_headers(&headers(&[("STRICT-TRANSPORT-SECURITY", "max-age=31536000")]));

        assert_eq!(mixed.0, upper.0);
        assert_eq!(
            mixed.0["Strict-Transport-Security"],
            HeaderPresence::Present("max-age=31536000".to_string())
        );
        assert_eq!(mixed.0["Content-Security-Policy"], HeaderPresence::Missing);
    }

    #[test]
    fn test_server_fingerprint() {
        let (_, _, fingerprint) = audit_headers(&headers(&[("Server", "Apache/2.4.1 (Ubuntu)")]));
        assert_eq!(fingerprint.software_name, "Apache/2.4.1");
        assert_eq!(fingerprint.os_hint, "Ubuntu");

        let (_, _, fingerprint) = audit_headers(&headers(&[("server", "nginx")]));
        assert_eq!(fingerprint.software_name, "nginx");
        assert_eq!(fingerprint.os_hint, "Hidden");
    }

    #[test]
    fn test_missing_server_header() {
        let (_, proxy, fingerprint) = audit_headers(&BTreeMap::new());
        assert_eq!(fingerprint.software_name, "Unknown");
        assert_eq!(fingerprint.os_hint, "Hidden");
        assert!(!proxy.detected);
        assert_eq!(proxy.summary(), "No Proxy Found");
    }

    #[test]
    fn test_proxy_evidence_order() {
        let (_, proxy, _) = audit_headers(&headers(&[
            ("forwarded", "for=1.2.3.4"),
            ("cf-ray", "abc"),
            ("VIA", "1.1 varnish"),
            ("Server", "cloudflare"),
        ]));
        assert!(proxy.detected);
        assert_eq!(proxy.evidence, vec!["Via", "CF-Ray", "Forwarded"]);
    }

    #[test]
    fn test_cloudflare_server_inferred_as_waf() {
        let (_, proxy, _) = audit_headers(&headers(&[("Server", "CloudFlare")]));
        assert!(proxy.detected);
        assert_eq!(proxy.evidence, vec!["WAF"]);
        assert_eq!(proxy.summary(), "Proxy Detected (WAF)");
    }

    #[test]
    fn test_audit_is_idempotent() {
        let input = headers(&[
            ("Content-Security-Policy", "default-src 'self'"),
            ("Server", "Microsoft-IIS/10.0 (Windows)"),
            ("X-Forwarded-For", "10.0.0.1"),
        ]);
        assert_eq!(audit_headers(&input), audit_headers(&input));
    }
}
