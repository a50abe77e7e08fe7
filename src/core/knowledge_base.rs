//! Static, read-only database of every finding the analysis can raise,
//! with the explanation and remediation shown in the report view.

use crate::core::models::Severity;
use strum::Display;

/// High-level grouping of findings, used as a prefix in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum FindingCategory {
    #[strum(to_string = "Target")]
    Target,
    #[strum(to_string = "Network Exposure")]
    Network,
    #[strum(to_string = "HTTP Security Headers")]
    Http,
    #[strum(to_string = "Page Content")]
    Content,
}

/// Everything needed to present one finding to a user.
pub struct FindingDetail {
    /// Machine-readable identifier (e.g. "HEADERS_HSTS_MISSING").
    pub code: &'static str,
    pub title: &'static str,
    pub category: FindingCategory,
    pub severity: Severity,
    pub description: &'static str,
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    // --- Target ---
    FindingDetail {
        code: "TARGET_RESOLUTION_FAILED",
        title: "Target Did Not Resolve",
        category: FindingCategory::Target,
        severity: Severity::Critical,
        description: "The hostname could not be resolved to an IP address, so no ports were probed and no page was audited. The rest of this report is empty.",
        remediation: "Check the spelling of the target and that its DNS records exist. If the host is internal, run the scan from a network that can resolve it."
    },
    FindingDetail {
        code: "PAGE_FETCH_FAILED",
        title: "Page Could Not Be Fetched",
        category: FindingCategory::Target,
        severity: Severity::Critical,
        description: "The HTTP request for the target page failed. Header and link results are missing, although the port scan results are still valid.",
        remediation: "Verify the target serves HTTP(S) on the given URL and port, and that no firewall or rate limit is blocking the scanner."
    },
    // --- Network ---
    FindingDetail {
        code: "PORT_CLEARTEXT_SERVICE",
        title: "Clear-Text Service Exposed",
        category: FindingCategory::Network,
        severity: Severity::Warning,
        description: "FTP, Telnet, POP3 or IMAP is reachable. These protocols send credentials and data unencrypted, so anyone on the path can read them.",
        remediation: "Disable the service, restrict it to trusted networks, or replace it with an encrypted alternative (SFTP, SSH, POP3S, IMAPS)."
    },
    FindingDetail {
        code: "PORT_DATABASE_EXPOSED",
        title: "Database Port Exposed",
        category: FindingCategory::Network,
        severity: Severity::Critical,
        description: "A MySQL port answers from the scanning host. Databases exposed to untrusted networks are a frequent target for brute-force and exploitation.",
        remediation: "Bind the database to localhost or a private interface and allow access only through a firewall rule or a bastion host."
    },
    FindingDetail {
        code: "VPN_ENDPOINT_EXPOSED",
        title: "VPN Endpoint Detected",
        category: FindingCategory::Network,
        severity: Severity::Info,
        description: "An OpenVPN, IPsec or PPTP port is open. This is often intentional, but it marks the host as a remote-access gateway worth hardening.",
        remediation: "Keep the VPN software patched, disable PPTP if present, and enforce strong authentication for remote users."
    },
    FindingDetail {
        code: "SERVER_VERSION_DISCLOSED",
        title: "Server Version Disclosed",
        category: FindingCategory::Network,
        severity: Severity::Info,
        description: "The Server header reveals the exact software version, which lets an attacker match the host against known vulnerabilities.",
        remediation: "Configure the web server to send a generic Server header (e.g. 'ServerTokens Prod' for Apache, 'server_tokens off' for Nginx)."
    },
    FindingDetail {
        code: "SERVER_OS_DISCLOSED",
        title: "Operating System Disclosed",
        category: FindingCategory::Network,
        severity: Severity::Info,
        description: "The Server header names the underlying operating system, narrowing down which exploits apply to the host.",
        remediation: "Strip the OS token from the Server header in the web server configuration."
    },
    FindingDetail {
        code: "PROXY_DETECTED",
        title: "Proxy or WAF in Front of Target",
        category: FindingCategory::Network,
        severity: Severity::Info,
        description: "Response headers show the page is served through a proxy, CDN or web application firewall. Results describe the intermediary as much as the origin.",
        remediation: "No action required. Make sure the origin server only accepts traffic from the proxy so it cannot be reached directly."
    },
    // --- HTTP ---
    FindingDetail {
        code: "HEADERS_HSTS_MISSING",
        title: "HSTS Header Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "Without Strict-Transport-Security, browsers may connect over plain HTTP first, leaving users open to downgrade and SSL-stripping attacks.",
        remediation: "Send 'Strict-Transport-Security: max-age=31536000; includeSubDomains' on all HTTPS responses."
    },
    FindingDetail {
        code: "HEADERS_CSP_MISSING",
        title: "Content-Security-Policy Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "No Content-Security-Policy restricts where scripts and other resources may load from, which makes cross-site scripting far easier to exploit.",
        remediation: "Start with a restrictive policy such as \"default-src 'self'\" and loosen it only for the sources the site actually needs."
    },
    FindingDetail {
        code: "HEADERS_X_FRAME_OPTIONS_MISSING",
        title: "X-Frame-Options Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "The page can be embedded in frames on other sites, enabling clickjacking attacks.",
        remediation: "Send 'X-Frame-Options: DENY' (or SAMEORIGIN), or use the CSP 'frame-ancestors' directive."
    },
    FindingDetail {
        code: "HEADERS_X_CONTENT_TYPE_OPTIONS_MISSING",
        title: "X-Content-Type-Options Missing",
        category: FindingCategory::Http,
        severity: Severity::Info,
        description: "Browsers may MIME-sniff responses and execute content with a type the server did not intend.",
        remediation: "Send 'X-Content-Type-Options: nosniff' on every response."
    },
    // --- Content ---
    FindingDetail {
        code: "PAGE_SENSITIVE_COMMENTS",
        title: "Sensitive HTML Comments",
        category: FindingCategory::Content,
        severity: Severity::Warning,
        description: "HTML comments in the page mention passwords, keys, configuration, admin areas, databases or users. Comments ship to every visitor and often leak credentials or internal paths left behind during development.",
        remediation: "Remove developer comments from production templates, or strip them in the build step. Rotate any secret that was exposed."
    },
];

/// Looks up the detail entry for a finding code.
pub fn get_finding_detail(code: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.code == code)
}

/// Finding code raised when the given audited header is missing.
pub fn missing_header_code(header: &str) -> Option<&'static str> {
    match header {
        "Strict-Transport-Security" => Some("HEADERS_HSTS_MISSING"),
        "Content-Security-Policy" => Some("HEADERS_CSP_MISSING"),
        "X-Frame-Options" => Some("HEADERS_X_FRAME_OPTIONS_MISSING"),
        "X-Content-Type-Options" => Some("HEADERS_X_CONTENT_TYPE_OPTIONS_MISSING"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::headers_scanner::AUDITED_HEADERS;

    #[test]
    fn test_every_audited_header_has_a_finding() {
        for header in AUDITED_HEADERS {
            let code = missing_header_code(header).expect("audited header without finding code");
            assert!(get_finding_detail(code).is_some(), "no detail for {code}");
        }
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in FINDINGS.iter().enumerate() {
            assert!(FINDINGS.iter().skip(i + 1).all(|b| b.code != a.code), "duplicate {}", a.code);
        }
    }
}
