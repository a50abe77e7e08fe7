// src/app.rs

use crate::config::ReconConfig;
use crate::core::analysis::analyze_report;
use crate::core::knowledge_base::{get_finding_detail, FindingCategory};
use crate::core::models::{AnalysisFinding, ReconReport, Severity};
use crate::core::report::{default_report_path, save_report, RESOLUTION_FAILED};
use chrono::Local;
use ratatui::widgets::ListState;
use tracing::{error, info};

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Disclaimer,
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub score: u8,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,
    pub target_resolved: bool,
    pub page_fetched: bool,
    pub headers_check_passed: bool,
    pub network_check_passed: bool,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    /// Shown in the input box when the last submitted target did not parse.
    pub input_error: Option<String>,
    pub scan_report: Option<ReconReport>,
    pub summary: ScanSummary,
    pub all_findings: Vec<AnalysisFinding>,
    pub analysis_list_state: ListState,
    pub spinner_frame: usize,
    /// Score drawn by the gauge; climbs towards `summary.score` on each tick.
    pub displayed_score: u8,
    pub export_status: ExportStatus,
    pub config: ReconConfig,
}

impl App {
    pub fn new(config: ReconConfig) -> Self {
        Self {
            should_quit: false,
            state: AppState::Disclaimer,
            input: String::new(),
            input_error: None,
            scan_report: None,
            summary: ScanSummary::default(),
            all_findings: Vec::new(),
            analysis_list_state: ListState::default(),
            spinner_frame: 0,
            displayed_score: 0,
            export_status: ExportStatus::Idle,
            config,
        }
    }

    pub fn on_tick(&mut self) {
        match self.state {
            AppState::Scanning => {
                self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
            }
            AppState::Finished if self.displayed_score < self.summary.score => {
                self.displayed_score = (self.displayed_score + 2).min(self.summary.score);
            }
            _ => {}
        }
    }

    /// Stores a finished report and derives the findings list and summary from it.
    pub fn finish_scan(&mut self, report: ReconReport) {
        self.scan_report = Some(report);
        self.state = AppState::Finished;
        self.update_summary();
    }

    pub fn update_summary(&mut self) {
        let Some(report) = &self.scan_report else {
            return;
        };

        let mut findings = analyze_report(report);
        findings.sort_by_key(|f| f.severity);

        let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
        let criticals = count(Severity::Critical);
        let warnings = count(Severity::Warning);
        let in_category = |category: FindingCategory| {
            findings.iter().any(|f| {
                f.severity != Severity::Info
                    && get_finding_detail(&f.code).is_some_and(|d| d.category == category)
            })
        };

        let score = 100_i16
            .saturating_sub((criticals * 15) as i16)
            .saturating_sub((warnings * 5) as i16);

        self.summary = ScanSummary {
            score: score.max(0) as u8,
            critical_issues: criticals,
            warning_issues: warnings,
            info_issues: count(Severity::Info),
            target_resolved: report.target_ip != RESOLUTION_FAILED,
            page_fetched: report.findings.status_code.is_some(),
            headers_check_passed: report.findings.status_code.is_some() && !in_category(FindingCategory::Http),
            network_check_passed: !in_category(FindingCategory::Network),
        };
        self.analysis_list_state
            .select(if findings.is_empty() { None } else { Some(0) });
        self.all_findings = findings;
        self.displayed_score = 0;
    }

    pub fn select_next(&mut self) {
        if self.all_findings.is_empty() {
            return;
        }
        let next = match self.analysis_list_state.selected() {
            Some(i) if i + 1 < self.all_findings.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.analysis_list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.all_findings.is_empty() {
            return;
        }
        let previous = match self.analysis_list_state.selected() {
            Some(0) | None => self.all_findings.len() - 1,
            Some(i) => i - 1,
        };
        self.analysis_list_state.select(Some(previous));
    }

    /// Saves the current report as JSON under the configured output directory.
    pub fn export_report(&mut self) {
        let Some(report) = &self.scan_report else {
            return;
        };
        let path = default_report_path(&self.config.output_dir, &report.target_host, Local::now());
        self.export_status = match save_report(report, &path) {
            Ok(()) => {
                info!(path = %path.display(), "Report exported from the UI.");
                ExportStatus::Success(path.display().to_string())
            }
            Err(e) => {
                error!(error = ?e, "Report export failed.");
                ExportStatus::Error(e.to_string())
            }
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.input_error = None;
        self.scan_report = None;
        self.summary = ScanSummary::default();
        self.all_findings = Vec::new();
        self.analysis_list_state = ListState::default();
        self.spinner_frame = 0;
        self.displayed_score = 0;
        self.export_status = ExportStatus::Idle;
    }
}
