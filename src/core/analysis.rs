// src/core/analysis.rs

use crate::core::error::ReconError;
use crate::core::knowledge_base::{get_finding_detail, missing_header_code};
use crate::core::models::{AnalysisFinding, ReconReport};
use crate::core::report::RESOLUTION_FAILED;
use crate::core::scanner::port_scanner::VPN_PORTS;
use tracing::debug;

const CLEARTEXT_PORTS: &[u16] = &[21, 23, 110, 143];
const DATABASE_PORTS: &[u16] = &[3306];

/// Derives security findings from a finished report.
///
/// Pure: the same report always yields the same findings in the same order.
pub fn analyze_report(report: &ReconReport) -> Vec<AnalysisFinding> {
    let mut codes: Vec<&'static str> = Vec::new();

    if report.target_ip == RESOLUTION_FAILED {
        codes.push("TARGET_RESOLUTION_FAILED");
    }
    if matches!(report.findings.error, Some(ReconError::FetchError { .. })) {
        codes.push("PAGE_FETCH_FAILED");
    }

    let open = |ports: &[u16]| report.open_ports.iter().any(|p| ports.contains(&p.port));
    if open(DATABASE_PORTS) {
        codes.push("PORT_DATABASE_EXPOSED");
    }
    if open(CLEARTEXT_PORTS) {
        codes.push("PORT_CLEARTEXT_SERVICE");
    }
    if open(VPN_PORTS) {
        codes.push("VPN_ENDPOINT_EXPOSED");
    }

    // Header findings only make sense for a page that was actually fetched.
    if report.findings.status_code.is_some() {
        for (header, presence) in &report.findings.security_header_audit {
            if !presence.is_present() {
                codes.extend(missing_header_code(header));
            }
        }
        if discloses_version(&report.findings.server_software) {
            codes.push("SERVER_VERSION_DISCLOSED");
        }
        if !matches!(report.findings.operating_system.as_str(), "Hidden" | "Unknown") {
            codes.push("SERVER_OS_DISCLOSED");
        }
        if report.findings.proxy_detected.detected {
            codes.push("PROXY_DETECTED");
        }
        if !report.findings.comments.is_empty() {
            codes.push("PAGE_SENSITIVE_COMMENTS");
        }
    }

    debug!(count = codes.len(), "Report analysis finished.");
    codes
        .into_iter()
        .filter_map(|code| get_finding_detail(code).map(|d| AnalysisFinding::new(d.severity, d.code)))
        .collect()
}

/// A `Server` value like "nginx/1.24.0" carries a version; "nginx" or "cloudflare" does not.
fn discloses_version(software: &str) -> bool {
    software
        .split_once('/')
        .is_some_and(|(_, version)| version.starts_with(|c: char| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{PageAudit, ProbeResult, ScanMetadata, Severity};
    use crate::core::report::aggregate;
    use crate::core::scanner::headers_scanner::audit_headers;
    use chrono::Local;
    use std::collections::BTreeMap;
    use std::net::{IpAddr, Ipv4Addr};

    fn report_with(headers: &[(&str, &str)], ports: &[u16]) -> ReconReport {
        let headers: BTreeMap<String, String> =
            headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let (header_audit, proxy, fingerprint) = audit_headers(&headers);
        let audit = PageAudit {
            final_url: "https://example.com/".to_string(),
            status: 200,
            headers,
            header_audit,
            proxy,
            fingerprint,
            links: Default::default(),
            navigation: Vec::new(),
            content: Default::default(),
        };
        let open_ports = ports
            .iter()
            .map(|&port| ProbeResult {
                port,
                open: true,
                service_name: "x".to_string(),
                banner: "x".to_string(),
                error: None,
            })
            .collect();
        let metadata = ScanMetadata {
            target_url: "https://example.com/".to_string(),
            target_host: "example.com".to_string(),
            target_ip: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            target_port: 443,
            scan_start_time: Some(Local::now()),
            geo_intel: BTreeMap::new(),
            domain_dates: BTreeMap::new(),
            vpn_status: String::new(),
            errors: Vec::new(),
        };
        aggregate(metadata, open_ports, Some(Ok(audit)))
    }

    fn codes(findings: &[AnalysisFinding]) -> Vec<&str> {
        findings.iter().map(|f| f.code.as_str()).collect()
    }

    #[test]
    fn test_hardened_site_is_clean() {
        let report = report_with(
            &[
                ("Strict-Transport-Security", "max-age=31536000"),
                ("Content-Security-Policy", "default-src 'self'"),
                ("X-Frame-Options", "DENY"),
                ("X-Content-Type-Options", "nosniff"),
                ("Server", "nginx"),
            ],
            &[443],
        );
        assert!(analyze_report(&report).is_empty());
    }

    #[test]
    fn test_exposed_host_findings() {
        let report = report_with(&[("Server", "Apache/2.4.1 (Ubuntu)")], &[21, 3306, 1194]);
        let findings = analyze_report(&report);
        let found = codes(&findings);

        for expected in [
            "PORT_DATABASE_EXPOSED",
            "PORT_CLEARTEXT_SERVICE",
            "VPN_ENDPOINT_EXPOSED",
            "HEADERS_HSTS_MISSING",
            "HEADERS_CSP_MISSING",
            "SERVER_VERSION_DISCLOSED",
            "SERVER_OS_DISCLOSED",
        ] {
            assert!(found.contains(&expected), "missing {expected}");
        }
        assert!(findings.iter().any(|f| f.severity == Severity::Critical));
    }

    #[test]
    fn test_flagged_comments_raise_finding() {
        let mut report = report_with(&[("Server", "nginx")], &[]);
        assert!(!codes(&analyze_report(&report)).contains(&"PAGE_SENSITIVE_COMMENTS"));

        report.findings.comments.push("db user: root".to_string());
        let findings = analyze_report(&report);
        let flagged = findings.iter().find(|f| f.code == "PAGE_SENSITIVE_COMMENTS").unwrap();
        assert_eq!(flagged.severity, Severity::Warning);
    }

    #[test]
    fn test_discloses_version() {
        assert!(discloses_version("nginx/1.24.0"));
        assert!(!discloses_version("nginx"));
        assert!(!discloses_version("gws/beta"));
    }
}
