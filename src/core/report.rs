// src/core/report.rs

use crate::core::error::ReconError;
use crate::core::models::{Findings, PageAudit, ProbeResult, ReconReport, ScanMetadata, ServerFingerprint};
use crate::core::scanner::headers_scanner::audit_headers;
use chrono::{DateTime, Local, TimeDelta};
use color_eyre::eyre::{Result, WrapErr};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// IP recorded in the report when the target host did not resolve.
pub const RESOLUTION_FAILED: &str = "Resolution Failed";

/// Merges the metadata, port scan and page audit into the final report.
///
/// `page_audit` is `None` when the audit was skipped because the host did not
/// resolve. The end time is captured here.
pub fn aggregate(
    metadata: ScanMetadata,
    open_ports: Vec<ProbeResult>,
    page_audit: Option<Result<PageAudit, ReconError>>,
) -> ReconReport {
    aggregate_at(metadata, open_ports, page_audit, Local::now())
}

fn aggregate_at(
    metadata: ScanMetadata,
    open_ports: Vec<ProbeResult>,
    page_audit: Option<Result<PageAudit, ReconError>>,
    scan_end_time: DateTime<Local>,
) -> ReconReport {
    let mut errors = metadata.errors;

    let total_time_taken = match metadata.scan_start_time {
        Some(start) => Some(format_duration(scan_end_time - start)),
        None => {
            warn!("Scan start time missing, report will carry no duration.");
            errors.push(ReconError::MissingStartTime);
            None
        }
    };

    let (findings, sub_urls, external_connections, navigation_map) = match page_audit {
        Some(Ok(audit)) => (
            Findings {
                page_url: Some(audit.final_url),
                status_code: Some(audit.status),
                http_headers: audit.headers,
                server_software: audit.fingerprint.software_name,
                operating_system: audit.fingerprint.os_hint,
                security_header_audit: audit.header_audit,
                proxy_status: audit.proxy.summary(),
                proxy_detected: audit.proxy,
                headings: audit.content.headings,
                hidden_inputs: audit.content.hidden_inputs,
                comments: audit.content.flagged_comments,
                error: None,
            },
            audit.links.internal_urls,
            audit.links.external_domains,
            audit.navigation,
        ),
        Some(Err(e)) => {
            errors.push(e.clone());
            (empty_findings(Some(e)), Vec::new(), Vec::new(), Vec::new())
        }
        None => (empty_findings(None), Vec::new(), Vec::new(), Vec::new()),
    };

    ReconReport {
        target_url: metadata.target_url,
        target_host: metadata.target_host,
        target_ip: metadata
            .target_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| RESOLUTION_FAILED.to_string()),
        target_port: metadata.target_port,
        scan_start_time: metadata.scan_start_time,
        scan_end_time,
        total_time_taken,
        geo_intel: metadata.geo_intel,
        domain_dates: metadata.domain_dates,
        open_ports,
        vpn_status: metadata.vpn_status,
        findings,
        sub_urls,
        external_connections,
        navigation_map,
        errors,
    }
}

/// Findings for a page that was never audited: every audited header reads as missing.
fn empty_findings(error: Option<ReconError>) -> Findings {
    let (security_header_audit, proxy_detected, _) = audit_headers(&BTreeMap::new());
    let fingerprint = ServerFingerprint::default();
    Findings {
        page_url: None,
        status_code: None,
        http_headers: BTreeMap::new(),
        server_software: fingerprint.software_name,
        operating_system: fingerprint.os_hint,
        security_header_audit,
        proxy_status: proxy_detected.summary(),
        proxy_detected,
        headings: Vec::new(),
        hidden_inputs: Vec::new(),
        comments: Vec::new(),
        error,
    }
}

/// Formats a duration as `H:MM:SS.mmm`; negative spans clamp to zero.
pub fn format_duration(delta: TimeDelta) -> String {
    let millis = delta.num_milliseconds().max(0);
    let (secs, millis) = (millis / 1000, millis % 1000);
    format!("{}:{:02}:{:02}.{:03}", secs / 3600, (secs % 3600) / 60, secs % 60, millis)
}

/// Report path under `dir` named after the host and the time of day.
pub fn default_report_path(dir: &Path, host: &str, now: DateTime<Local>) -> PathBuf {
    let host_clean = host.replace(['.', ':'], "_");
    dir.join(format!("{}_{}.json", host_clean, now.format("%H%M%S")))
}

/// Writes the report as pretty-printed JSON, creating parent directories as needed.
pub fn save_report(report: &ReconReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating report directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).wrap_err("serializing report")?;
    fs::write(path, json).wrap_err_with(|| format!("writing report to {}", path.display()))?;
    info!(path = %path.display(), "Report saved.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{HeaderPresence, LinkClassification, NavigationEdge, PageContent, ProxyVerdict};
    use chrono::TimeZone;
    use std::net::{IpAddr, Ipv4Addr};

    fn metadata(start: Option<DateTime<Local>>) -> ScanMetadata {
        ScanMetadata {
            target_url: "https://example.com/".to_string(),
            target_host: "example.com".to_string(),
            target_ip: Some(IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))),
            target_port: 443,
            scan_start_time: start,
            geo_intel: BTreeMap::new(),
            domain_dates: BTreeMap::new(),
            vpn_status: "No VPN Server Found".to_string(),
            errors: Vec::new(),
        }
    }

    fn page_audit() -> PageAudit {
        let headers: BTreeMap<String, String> =
            [("Server".to_string(), "Apache/2.4.1 (Ubuntu)".to_string())].into_iter().collect();
        let (header_audit, proxy, fingerprint) = audit_headers(&headers);
        PageAudit {
            final_url: "https://example.com/".to_string(),
            status: 200,
            headers,
            header_audit,
            proxy,
            fingerprint,
            links: LinkClassification {
                internal_urls: vec!["https://example.com/about".to_string()],
                external_domains: vec!["other.org".to_string()],
            },
            navigation: vec![NavigationEdge {
                from: "https://example.com/".to_string(),
                to: "https://example.com/about".to_string(),
                text: "About".to_string(),
            }],
            content: PageContent {
                headings: vec!["Welcome".to_string()],
                hidden_inputs: vec!["csrf_token".to_string()],
                flagged_comments: vec!["TODO remove admin password".to_string()],
            },
        }
    }

    fn ssh_port() -> ProbeResult {
        ProbeResult {
            port: 22,
            open: true,
            service_name: "ssh".to_string(),
            banner: "SSH-2.0-OpenSSH_8.9".to_string(),
            error: None,
        }
    }

    #[test]
    fn test_missing_start_time_omits_duration() {
        let report = aggregate(metadata(None), vec![], Some(Ok(page_audit())));

        assert!(report.total_time_taken.is_none());
        assert_eq!(report.errors, vec![ReconError::MissingStartTime]);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("total_time_taken").is_none());
        assert!(json.get("scan_end_time").is_some());
    }

    #[test]
    fn test_duration_from_start_and_end() {
        let start = Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let end = start + TimeDelta::milliseconds(65_250);
        let report = aggregate_at(metadata(Some(start)), vec![ssh_port()], Some(Ok(page_audit())), end);

        assert_eq!(report.total_time_taken.as_deref(), Some("0:01:05.250"));
        assert!(report.errors.is_empty());
        assert_eq!(report.findings.server_software, "Apache/2.4.1");
        assert_eq!(report.findings.operating_system, "Ubuntu");
        assert_eq!(report.sub_urls, vec!["https://example.com/about"]);
        assert_eq!(report.external_connections, vec!["other.org"]);
        assert_eq!(report.open_ports.len(), 1);
    }

    #[test]
    fn test_report_json_shape() {
        let report = aggregate(metadata(Some(Local::now())), vec![ssh_port()], Some(Ok(page_audit())));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["target_ip"], "93.184.216.34");
        assert_eq!(json["open_ports"][0]["service"], "ssh");
        assert_eq!(json["open_ports"][0]["banner"], "SSH-2.0-OpenSSH_8.9");
        assert_eq!(json["findings"]["security_header_audit"]["Content-Security-Policy"], "MISSING");
        assert_eq!(json["findings"]["proxy_detected"]["detected"], false);
        assert_eq!(json["navigation_map"][0]["text"], "About");
        assert_eq!(json["findings"]["proxy_status"], "No Proxy Found");
        assert_eq!(json["findings"]["headings"][0], "Welcome");
        assert_eq!(json["findings"]["hidden_inputs"][0], "csrf_token");
        assert_eq!(json["findings"]["comments"][0], "TODO remove admin password");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_fetch_error_keeps_port_data() {
        let error = ReconError::FetchError {
            url: "https://example.com/".to_string(),
            reason: "timed out".to_string(),
        };
        let report = aggregate(metadata(Some(Local::now())), vec![ssh_port()], Some(Err(error.clone())));

        assert_eq!(report.open_ports.len(), 1);
        assert_eq!(report.findings.error, Some(error.clone()));
        assert_eq!(report.errors, vec![error]);
        assert_eq!(
            report.findings.security_header_audit["Strict-Transport-Security"],
            HeaderPresence::Missing
        );
        assert!(report.navigation_map.is_empty());
        assert_eq!(report.findings.proxy_status, "No Proxy Found");
        assert!(report.findings.comments.is_empty());
    }

    #[test]
    fn test_unresolved_target_uses_sentinel_ip() {
        let mut meta = metadata(Some(Local::now()));
        meta.target_ip = None;
        meta.errors.push(ReconError::ResolutionFailure {
            host: "example.com".to_string(),
            reason: "no record".to_string(),
        });

        let report = aggregate(meta, vec![], None);
        assert_eq!(report.target_ip, RESOLUTION_FAILED);
        assert_eq!(report.findings.proxy_detected, ProxyVerdict::default());
        assert!(report.findings.error.is_none());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::milliseconds(0)), "0:00:00.000");
        assert_eq!(format_duration(TimeDelta::seconds(3_725)), "1:02:05.000");
        assert_eq!(format_duration(TimeDelta::seconds(-5)), "0:00:00.000");
    }

    #[test]
    fn test_default_report_path() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 8, 7).unwrap();
        let path = default_report_path(Path::new("scans"), "www.example.com", now);
        assert_eq!(path, Path::new("scans").join("www_example_com_090807.json"));
    }

    #[test]
    fn test_save_report_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("vanguard-recon-test-{}", std::process::id()));
        let path = dir.join("nested").join("report.json");
        let report = aggregate(metadata(None), vec![ssh_port()], Some(Ok(page_audit())));

        save_report(&report, &path).unwrap();
        let loaded: ReconReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.open_ports, report.open_ports);
        assert_eq!(loaded.errors, vec![ReconError::MissingStartTime]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
