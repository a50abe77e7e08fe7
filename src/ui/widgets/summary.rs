// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

/// Renders the summary widget: score, gauge, pass/fail checks, issue counts
/// and the target's network details. Empty until a scan has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & Rating section
            Constraint::Length(1), // Gauge chart
            Constraint::Length(1), // Spacer
            Constraint::Length(5), // Security Checks section
            Constraint::Length(1), // Spacer
            Constraint::Length(4), // Issues Found section
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Target section
        ])
        .split(area);

    if app.state != AppState::Finished {
        return;
    }

    // --- Score & Rating Section ---
    let (rating_text, rating_style) = match app.summary.score {
        90..=100 => ("Excellent", Style::default().fg(Color::Green)),
        75..=89 => ("Good", Style::default().fg(Color::Cyan)),
        50..=74 => ("Needs Improvement", Style::default().fg(Color::Yellow)),
        _ => ("Poor", Style::default().fg(Color::Red)),
    };
    let score_line = Line::from(format!("{}/100 ({})", app.summary.score, rating_text)).style(rating_style);
    let score_text = Text::from(vec![Line::from("Overall Score".bold()), score_line]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    // --- Gauge Chart (Animated) ---
    let score_gauge = Gauge::default()
        .percent(u16::from(app.displayed_score))
        .label("")
        .style(Style::default().fg(
            if app.displayed_score >= 80 { Color::Green }
            else if app.displayed_score >= 50 { Color::Yellow }
            else { Color::Red }
        ));
    frame.render_widget(score_gauge, summary_chunks[1]);

    // --- Security Checks Section ---
    let checks_block = Block::default().title("SECURITY CHECKS".bold());
    let checks_to_render = [
        ("Target Resolved", app.summary.target_resolved),
        ("Page Fetched", app.summary.page_fetched),
        ("HTTP Security Headers", app.summary.headers_check_passed),
        ("Network Exposure", app.summary.network_check_passed),
    ];
    let checks_lines: Vec<Line> = checks_to_render
        .into_iter()
        .map(|(name, passed)| {
            let (icon, style) = if passed {
                ("✓", Style::default().fg(Color::Green))
            } else {
                ("✗", Style::default().fg(Color::Red))
            };
            Line::from(vec![Span::styled(format!("{} ", icon), style), Span::raw(name)])
        })
        .collect();
    frame.render_widget(Paragraph::new(checks_lines).block(checks_block), summary_chunks[3]);

    // --- Issue Details Section ---
    let issues_block = Block::default().title("ISSUES FOUND".bold());
    let details_text = Text::from(vec![
        Line::from(vec![Span::raw("Critical: "), Span::styled(app.summary.critical_issues.to_string(), Style::default().fg(Color::Red))]),
        Line::from(vec![Span::raw("Warnings: "), Span::styled(app.summary.warning_issues.to_string(), Style::default().fg(Color::Yellow))]),
        Line::from(vec![Span::raw("Info:     "), Span::styled(app.summary.info_issues.to_string(), Style::default().fg(Color::Cyan))]),
    ]);
    frame.render_widget(Paragraph::new(details_text).block(issues_block), summary_chunks[5]);

    // --- Target Section ---
    let target_block = Block::default().title("TARGET".bold());
    let mut target_lines = Vec::new();
    if let Some(report) = &app.scan_report {
        let field = |label: &str, value: String| {
            Line::from(vec![Span::raw(format!("{label}: ")), Span::styled(value, Style::default().fg(Color::Cyan))])
        };
        target_lines.push(field("IP", report.target_ip.clone()));
        target_lines.push(field("Server", report.findings.server_software.clone()));
        target_lines.push(field("OS", report.findings.operating_system.clone()));
        for key in ["country", "isp", "as"] {
            if let Some(value) = report.geo_intel.get(key).and_then(|v| v.as_str()) {
                target_lines.push(field(&key.to_uppercase(), value.to_string()));
            }
        }
        target_lines.push(Line::from(report.vpn_status.clone()));
        if let Some(took) = &report.total_time_taken {
            target_lines.push(field("Took", took.clone()));
        }
    }
    let target_paragraph = Paragraph::new(target_lines).block(target_block).wrap(Wrap { trim: true });
    frame.render_widget(target_paragraph, summary_chunks[7]);
}
