// src/core/models.rs

use crate::core::error::ReconError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use strum::Display;

// --- Port Probe Models ---

/// Banner reported when the service accepted the connection but sent nothing back.
pub const NO_BANNER: &str = "No Banner Responded";
/// Banner reported when the dedicated banner connection could not be established.
pub const BANNER_FAILED: &str = "Banner Grabbing Failed";
/// Service name used when the port is not in the well-known table.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// One (host, port) pair to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: IpAddr,
    pub port: u16,
}

/// The outcome of probing a single open port.
///
/// Closed or unreachable ports never produce a `ProbeResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    pub port: u16,
    pub open: bool,
    #[serde(rename = "service")]
    pub service_name: String,
    pub banner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// --- HTTP Header Audit Models ---

/// Presence of a single audited header. Serialized as the raw header value, or
/// as the `"MISSING"` sentinel when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum HeaderPresence {
    Present(String),
    Missing,
}

impl HeaderPresence {
    pub const MISSING: &'static str = "MISSING";

    pub fn status(&self) -> &'static str {
        match self {
            HeaderPresence::Present(_) => "PRESENT",
            HeaderPresence::Missing => Self::MISSING,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HeaderPresence::Present(_))
    }
}

impl From<String> for HeaderPresence {
    fn from(value: String) -> Self {
        if value == Self::MISSING {
            HeaderPresence::Missing
        } else {
            HeaderPresence::Present(value)
        }
    }
}

impl From<HeaderPresence> for String {
    fn from(value: HeaderPresence) -> Self {
        match value {
            HeaderPresence::Present(v) => v,
            HeaderPresence::Missing => HeaderPresence::MISSING.to_string(),
        }
    }
}

/// Presence audit keyed by the canonical header name (e.g. "Strict-Transport-Security").
pub type HeaderAudit = BTreeMap<String, HeaderPresence>;

/// Whether the page appears to sit behind a proxy, CDN or WAF.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyVerdict {
    pub detected: bool,
    pub evidence: Vec<String>,
}

impl ProxyVerdict {
    pub fn summary(&self) -> String {
        if self.detected {
            format!("Proxy Detected ({})", self.evidence.join(", "))
        } else {
            "No Proxy Found".to_string()
        }
    }
}

/// Software and OS hints parsed out of the `Server` header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerFingerprint {
    pub software_name: String,
    pub os_hint: String,
}

impl Default for ServerFingerprint {
    fn default() -> Self {
        Self {
            software_name: "Unknown".to_string(),
            os_hint: "Unknown".to_string(),
        }
    }
}

// --- Link Models ---

/// An anchor tag as found on the fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// One directed link from the audited page to a discovered URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationEdge {
    pub from: String,
    pub to: String,
    pub text: String,
}

/// Internal URLs and external hostnames found on the audited page, both sorted and deduplicated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkClassification {
    pub internal_urls: Vec<String>,
    pub external_domains: Vec<String>,
}

// --- Page Audit Models ---

/// Content of the audited page worth a second look.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Trimmed text of every `h1` and `h2`, in page order.
    pub headings: Vec<String>,
    /// `name` of every hidden `<input>`, or "unnamed".
    pub hidden_inputs: Vec<String>,
    /// HTML comments mentioning credentials, config or admin terms.
    pub flagged_comments: Vec<String>,
}

/// What the fetch capability hands back for a single page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: url::Url,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub anchors: Vec<Anchor>,
    pub content: PageContent,
}

/// Everything learned from the one audited page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageAudit {
    pub final_url: String,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub header_audit: HeaderAudit,
    pub proxy: ProxyVerdict,
    pub fingerprint: ServerFingerprint,
    pub links: LinkClassification,
    pub navigation: Vec<NavigationEdge>,
    pub content: PageContent,
}

// --- Report ---

/// Opaque metadata gathered before aggregation.
#[derive(Debug, Clone)]
pub struct ScanMetadata {
    pub target_url: String,
    pub target_host: String,
    pub target_ip: Option<IpAddr>,
    pub target_port: u16,
    pub scan_start_time: Option<DateTime<Local>>,
    pub geo_intel: BTreeMap<String, serde_json::Value>,
    pub domain_dates: BTreeMap<String, String>,
    pub vpn_status: String,
    pub errors: Vec<ReconError>,
}

/// Page-level findings as they appear under `findings` in the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Findings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub http_headers: BTreeMap<String, String>,
    pub server_software: String,
    pub operating_system: String,
    pub security_header_audit: HeaderAudit,
    pub proxy_detected: ProxyVerdict,
    /// `proxy_detected` rendered as "Proxy Detected (...)" or "No Proxy Found".
    pub proxy_status: String,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub hidden_inputs: Vec<String>,
    /// Flagged HTML comments.
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReconError>,
}

/// The single, fully assembled result of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconReport {
    pub target_url: String,
    pub target_host: String,
    pub target_ip: String,
    pub target_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_start_time: Option<DateTime<Local>>,
    pub scan_end_time: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_taken: Option<String>,
    pub geo_intel: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain_dates: BTreeMap<String, String>,
    pub open_ports: Vec<ProbeResult>,
    pub vpn_status: String,
    pub findings: Findings,
    pub sub_urls: Vec<String>,
    pub external_connections: Vec<String>,
    pub navigation_map: Vec<NavigationEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReconError>,
}

// --- Analysis ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisFinding {
    pub severity: Severity,
    pub code: String,
}

impl AnalysisFinding {
    pub fn new(severity: Severity, code: &str) -> Self {
        Self { severity, code: code.to_string() }
    }
}
