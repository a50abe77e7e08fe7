// src/config.rs

use crate::cli::Cli;
use crate::core::error::ReconError;
use crate::core::scanner::port_scanner::{ProbeTimeouts, DEFAULT_CONCURRENCY, DEFAULT_PORTS};
use crate::logging::get_data_dir;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Every tunable of a scan.
#[derive(Debug, Clone)]
pub struct ReconConfig {
    pub connect_timeout: Duration,
    pub banner_timeout: Duration,
    pub fetch_timeout: Duration,
    pub ports: Vec<u16>,
    /// Upper bound on ports being scanned at once.
    pub concurrency: usize,
    pub user_agent: String,
    pub geo_intel: bool,
    /// Wall-clock limit for a headless scan.
    pub worker_budget: Duration,
    pub output_dir: PathBuf,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            banner_timeout: Duration::from_secs(2),
            fetch_timeout: Duration::from_secs(15),
            ports: DEFAULT_PORTS.to_vec(),
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geo_intel: true,
            worker_budget: Duration::from_secs(300),
            output_dir: get_data_dir().join("scans"),
        }
    }
}

impl ReconConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ReconError> {
        let defaults = Self::default();
        let ports = match &cli.ports {
            Some(spec) => parse_port_spec(spec)?,
            None => defaults.ports,
        };

        Ok(Self {
            connect_timeout: Duration::from_millis(cli.connect_timeout_ms),
            banner_timeout: Duration::from_millis(cli.banner_timeout_ms),
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
            ports,
            concurrency: cli.concurrency.max(1),
            user_agent: cli.user_agent.clone().unwrap_or(defaults.user_agent),
            geo_intel: !cli.no_geo,
            worker_budget: Duration::from_secs(cli.budget_secs),
            output_dir: cli.output_dir.clone().unwrap_or(defaults.output_dir),
        })
    }

    pub fn probe_timeouts(&self) -> ProbeTimeouts {
        ProbeTimeouts {
            connect: self.connect_timeout,
            banner: self.banner_timeout,
        }
    }
}

/// Parses a port specification.
/// Supports: "80", "80,443", "1-1024", "80,443,8000-9000"
pub fn parse_port_spec(spec: &str) -> Result<Vec<u16>, ReconError> {
    let invalid = |reason: String| ReconError::InvalidPortSpec { spec: spec.to_string(), reason };
    let parse_port = |s: &str| -> Result<u16, ReconError> {
        match s.trim().parse::<u16>() {
            Ok(0) | Err(_) => Err(invalid(format!("invalid port '{}'", s.trim()))),
            Ok(port) => Ok(port),
        }
    };

    let mut ports = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((start, end)) = part.split_once('-') {
            let (start, end) = (parse_port(start)?, parse_port(end)?);
            if start > end {
                return Err(invalid(format!("range {start}-{end} is reversed")));
            }
            ports.extend(start..=end);
        } else {
            ports.push(parse_port(part)?);
        }
    }

    if ports.is_empty() {
        return Err(invalid("no ports given".to_string()));
    }
    ports.sort_unstable();
    ports.dedup();
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_port_spec() {
        assert_eq!(parse_port_spec("80").unwrap(), vec![80]);
        assert_eq!(parse_port_spec("443, 80,80").unwrap(), vec![80, 443]);
        assert_eq!(parse_port_spec("22,8000-8002").unwrap(), vec![22, 8000, 8001, 8002]);
    }

    #[test]
    fn test_parse_port_spec_errors() {
        for bad in ["", "http", "0", "70000", "90-80", "1-"] {
            assert!(
                matches!(parse_port_spec(bad), Err(ReconError::InvalidPortSpec { .. })),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::parse_from([
            "vanguard-recon",
            "example.com",
            "out.json",
            "--ports",
            "22,443",
            "--no-geo",
            "--connect-timeout-ms",
            "250",
            "--concurrency",
            "0",
        ]);
        let config = ReconConfig::from_cli(&cli).unwrap();

        assert_eq!(cli.target.as_deref(), Some("example.com"));
        assert_eq!(config.ports, vec![22, 443]);
        assert!(!config.geo_intel);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.banner_timeout, Duration::from_secs(2));
        assert_eq!(config.worker_budget, Duration::from_secs(300));
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_concurrency_defaults_to_bounded() {
        let cli = Cli::parse_from(["vanguard-recon", "--ports", "1-65535"]);
        let config = ReconConfig::from_cli(&cli).unwrap();
        assert_eq!(config.ports.len(), 65535);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_default_ports_keep_reference_order() {
        let config = ReconConfig::default();
        assert_eq!(config.ports.len(), 15);
        assert_eq!(config.ports[0], 21);
        assert_eq!(*config.ports.last().unwrap(), 1723);
    }
}
