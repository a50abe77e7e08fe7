// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Lightweight reconnaissance of a single host: open ports and banners,
/// security headers, server fingerprint and the links of its landing page.
///
/// Without a TARGET the interactive terminal UI starts. With a TARGET the scan
/// runs headless and writes a JSON report.
#[derive(Parser, Debug, Clone)]
#[command(name = "vanguard-recon", version, about)]
pub struct Cli {
    /// URL or hostname to scan headless (e.g. https://example.com)
    pub target: Option<String>,

    /// Where to write the JSON report (default: <output-dir>/<host>_<HHMMSS>.json)
    pub output: Option<PathBuf>,

    /// TCP connect timeout for the liveness check, in milliseconds
    #[arg(long, env = "VANGUARD_RECON_CONNECT_TIMEOUT_MS", default_value_t = 1000)]
    pub connect_timeout_ms: u64,

    /// Timeout for the banner connection and read, in milliseconds
    #[arg(long, env = "VANGUARD_RECON_BANNER_TIMEOUT_MS", default_value_t = 2000)]
    pub banner_timeout_ms: u64,

    /// Timeout for fetching the target page, in seconds
    #[arg(long, env = "VANGUARD_RECON_FETCH_TIMEOUT_SECS", default_value_t = 15)]
    pub fetch_timeout_secs: u64,

    /// Ports to probe, e.g. "22,80,443" or "1-1024" (default: common service and VPN ports)
    #[arg(long, env = "VANGUARD_RECON_PORTS")]
    pub ports: Option<String>,

    /// Maximum number of ports scanned at the same time
    #[arg(long, env = "VANGUARD_RECON_CONCURRENCY", default_value_t = 100)]
    pub concurrency: usize,

    /// User-Agent sent with the page request
    #[arg(long, env = "VANGUARD_RECON_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Skip the geo/ISP lookup of the target IP
    #[arg(long, env = "VANGUARD_RECON_NO_GEO", default_value_t = false)]
    pub no_geo: bool,

    /// Wall-clock budget for a headless scan, in seconds
    #[arg(long, env = "VANGUARD_RECON_BUDGET_SECS", default_value_t = 300)]
    pub budget_secs: u64,

    /// Directory for saved reports
    #[arg(long, env = "VANGUARD_RECON_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}
