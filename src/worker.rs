// src/worker.rs

use crate::config::ReconConfig;
use crate::core::analysis::analyze_report;
use crate::core::models::{ReconReport, Severity};
use crate::core::report::{default_report_path, save_report};
use crate::core::scanner::{run_full_scan, target::ScanTarget};
use chrono::Local;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::path::PathBuf;
use tracing::{error, info};

/// Runs one scan without the TUI and writes the report to disk.
///
/// Fails on an invalid target, on exceeding the configured budget, or when the
/// report cannot be written. Returns the path the report was saved to.
pub async fn run_headless(input: &str, output: Option<PathBuf>, config: &ReconConfig) -> Result<PathBuf> {
    let target = ScanTarget::parse(input).wrap_err("invalid scan target")?;
    info!(url = %target.url, budget = ?config.worker_budget, "Headless scan started.");

    let report = match tokio::time::timeout(config.worker_budget, run_full_scan(&target, config)).await {
        Ok(report) => report,
        Err(_) => {
            error!(url = %target.url, "Scan exceeded its time budget.");
            return Err(eyre!(
                "scan of {} did not finish within {:?}",
                target.url,
                config.worker_budget
            ));
        }
    };

    let path = output.unwrap_or_else(|| default_report_path(&config.output_dir, &target.host, Local::now()));
    save_report(&report, &path)?;
    println!("{}", summary_line(&report, &path));
    Ok(path)
}

fn summary_line(report: &ReconReport, path: &std::path::Path) -> String {
    let findings = analyze_report(report);
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
    format!(
        "{} ({}): {} open port(s), {} critical, {} warning, {} info. Took {}. Report: {}",
        report.target_host,
        report.target_ip,
        report.open_ports.len(),
        count(Severity::Critical),
        count(Severity::Warning),
        count(Severity::Info),
        report.total_time_taken.as_deref().unwrap_or("n/a"),
        path.display()
    )
}
