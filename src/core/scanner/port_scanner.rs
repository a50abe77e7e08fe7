// src/core/scanner/port_scanner.rs

use crate::core::error::ReconError;
use crate::core::models::{
    ProbeResult, ProbeTarget, BANNER_FAILED, NO_BANNER, UNKNOWN_SERVICE,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

/// Ports probed when the caller does not supply its own list.
pub const DEFAULT_PORTS: &[u16] = &[
    21, 22, 23, 25, 53, 80, 110, 143, 443, 3306, 8080, 1194, 500, 4500, 1723,
];

/// Ports whose presence hints at a VPN endpoint (OpenVPN, IKE, IPsec NAT-T, PPTP).
pub const VPN_PORTS: &[u16] = &[1194, 500, 4500, 1723];

/// Probes allowed in flight at once when the caller does not choose.
pub const DEFAULT_CONCURRENCY: usize = 100;

const BANNER_PROBE: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";
const MAX_BANNER_SIZE: usize = 1024;

/// Timeouts for a single probe.
#[derive(Debug, Clone, Copy)]
pub struct ProbeTimeouts {
    pub connect: Duration,
    pub banner: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(1),
            banner: Duration::from_secs(2),
        }
    }
}

/// Maps well-known TCP ports to their IANA service names.
pub fn service_name(port: u16) -> &'static str {
    match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "domain",
        80 => "http",
        110 => "pop3",
        143 => "imap2",
        443 => "https",
        465 => "submissions",
        500 => "isakmp",
        587 => "submission",
        993 => "imaps",
        995 => "pop3s",
        1194 => "openvpn",
        1723 => "pptp",
        3306 => "mysql",
        3389 => "ms-wbt-server",
        4500 => "ipsec-nat-t",
        5432 => "postgresql",
        6379 => "redis",
        8080 => "http-alt",
        8443 => "https-alt",
        _ => UNKNOWN_SERVICE,
    }
}

/// Probes one port: a liveness connect, then a separate banner-grab connection.
///
/// Returns `None` when the port does not accept a connection within
/// `timeouts.connect`. Once the port is known to be open a result is always
/// returned; banner problems only change the banner text and the `error` field.
pub async fn probe_port(target: ProbeTarget, timeouts: ProbeTimeouts) -> Option<ProbeResult> {
    let addr = SocketAddr::new(target.host, target.port);

    match timeout(timeouts.connect, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => drop(stream),
        Ok(Err(e)) => {
            trace!(port = target.port, error = %e, "Port closed.");
            return None;
        }
        Err(_) => {
            trace!(port = target.port, "Connect timed out.");
            return None;
        }
    }

    debug!(port = target.port, "Port open, grabbing banner.");
    Some(open_port_result(target.port, grab_banner(addr, timeouts.banner).await))
}

/// Builds the result for a port that passed the liveness check.
fn open_port_result(port: u16, banner: Result<String, ReconError>) -> ProbeResult {
    let (banner, error) = match banner {
        Ok(banner) => (banner, None),
        Err(e) => (BANNER_FAILED.to_string(), Some(e.to_string())),
    };

    ProbeResult {
        port,
        open: true,
        service_name: service_name(port).to_string(),
        banner,
        error,
    }
}

/// Opens the banner connection, sends the probe payload and returns the first response line.
///
/// Only a failure to establish the connection is an error. Once connected, any
/// outcome that yields no bytes (EOF, read timeout, reset) degrades to `NO_BANNER`.
async fn grab_banner(addr: SocketAddr, banner_timeout: Duration) -> Result<String, ReconError> {
    let mut stream = match timeout(banner_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            return Err(ReconError::ProbeFailure { port: addr.port(), reason: e.to_string() });
        }
        Err(_) => {
            return Err(ReconError::ProbeFailure {
                port: addr.port(),
                reason: "banner connection timed out".to_string(),
            });
        }
    };

    if let Err(e) = stream.write_all(BANNER_PROBE).await {
        debug!(port = addr.port(), error = %e, "Could not send banner probe.");
    }

    let mut buffer = vec![0u8; MAX_BANNER_SIZE];
    let read = match timeout(banner_timeout, stream.read(&mut buffer)).await {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            debug!(port = addr.port(), error = %e, "Banner read failed.");
            0
        }
        Err(_) => {
            debug!(port = addr.port(), "Banner read timed out.");
            0
        }
    };

    Ok(first_line(&buffer[..read]).unwrap_or_else(|| NO_BANNER.to_string()))
}

/// Decodes lossily and returns the first non-empty line of the trimmed payload.
fn first_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.lines().next().map(|line| line.trim_end().to_string())
}

/// Probes every port concurrently and waits for all of them.
///
/// Each probe runs in its own task and hands its result back through its join
/// handle; results are merged only after the join. At most `concurrency` tasks
/// hold sockets at any time, so large port ranges cannot exhaust file handles
/// and turn open ports into false negatives. The output is sorted by port
/// number so repeated scans of the same host compare equal.
pub async fn scan_ports(
    host: IpAddr,
    ports: &[u16],
    timeouts: ProbeTimeouts,
    concurrency: usize,
) -> Vec<ProbeResult> {
    let concurrency = concurrency.max(1);
    info!(%host, ports = ports.len(), concurrency, "Starting port scan.");

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let handles: Vec<_> = ports
        .iter()
        .map(|&port| {
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                probe_port(ProbeTarget { host, port }, timeouts).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Probe task did not complete."),
        }
    }

    results.sort_by_key(|r| r.port);
    info!(open = results.len(), "Port scan finished.");
    results
}

/// Derives the VPN status line from the first open VPN-indicator port, if any.
pub fn vpn_status(results: &[ProbeResult]) -> String {
    results
        .iter()
        .find(|r| VPN_PORTS.contains(&r.port))
        .map(|r| format!("VPN Found! Banner: {}", r.banner))
        .unwrap_or_else(|| "No VPN Server Found".to_string())
}
