// src/core/scanner/mod.rs

pub mod geo_intel;
pub mod headers_scanner;
pub mod link_classifier;
pub mod page_auditor;
pub mod port_scanner;
pub mod target;

use crate::config::ReconConfig;
use crate::core::models::{ReconReport, ScanMetadata};
use crate::core::report::aggregate;
use chrono::Local;
use std::collections::BTreeMap;
use tracing::{info, warn};

use self::geo_intel::lookup_geo_intel;
use self::page_auditor::{audit_page, HttpFetcher};
use self::port_scanner::{scan_ports, vpn_status};
use self::target::{resolve_host, ScanTarget};

/// Runs one complete reconnaissance of `target` and returns the finished report.
///
/// The host is resolved first. The port scan, page audit and geo lookup then run
/// concurrently with `tokio::join!`, and their results are merged only after all
/// three have completed. A host that does not resolve still yields a report,
/// with no ports, no page audit and the failure recorded in `errors`.
pub async fn run_full_scan(target: &ScanTarget, config: &ReconConfig) -> ReconReport {
    let scan_start_time = Local::now();
    info!(url = %target.url, "Starting full scan.");

    let mut metadata = ScanMetadata {
        target_url: target.url.to_string(),
        target_host: target.host.clone(),
        target_ip: None,
        target_port: target.port,
        scan_start_time: Some(scan_start_time),
        geo_intel: BTreeMap::new(),
        domain_dates: BTreeMap::new(),
        vpn_status: String::new(),
        errors: Vec::new(),
    };

    let ip = match resolve_host(&target.host).await {
        Ok(ip) => ip,
        Err(e) => {
            warn!(host = %target.host, error = %e, "Target did not resolve, skipping probes.");
            metadata.errors.push(e);
            metadata.vpn_status = vpn_status(&[]);
            return aggregate(metadata, Vec::new(), None);
        }
    };
    metadata.target_ip = Some(ip);

    let timeouts = config.probe_timeouts();
    let fetcher = HttpFetcher::new(&config.user_agent, config.fetch_timeout);

    let (open_ports, page_audit, geo_intel) = tokio::join!(
        scan_ports(ip, &config.ports, timeouts, config.concurrency),
        async {
            match &fetcher {
                Ok(fetcher) => audit_page(fetcher, target).await,
                Err(e) => Err(e.clone()),
            }
        },
        async {
            match &fetcher {
                Ok(fetcher) if config.geo_intel => lookup_geo_intel(fetcher.client(), ip).await,
                _ => BTreeMap::new(),
            }
        }
    );

    metadata.geo_intel = geo_intel;
    metadata.vpn_status = vpn_status(&open_ports);

    let report = aggregate(metadata, open_ports, Some(page_audit));
    info!(
        open_ports = report.open_ports.len(),
        errors = report.errors.len(),
        "Full scan finished."
    );
    report
}
