// src/ui/widgets/report_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::knowledge_base::{get_finding_detail, FindingCategory};
use crate::core::models::{ReconReport, Severity};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn render_report_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Recon Report (Navigate with ↑ ↓)");

    if app.state != AppState::Finished {
        let content = match app.state {
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw("Probing ports and auditing the page... Please wait."),
                ]))
                .alignment(Alignment::Center)
            }
            _ => Paragraph::new("Scan results will appear here...").alignment(Alignment::Center),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Min(0),
        ])
        .split(inner_area);

    let items: Vec<ListItem> = app
        .all_findings
        .iter()
        .filter_map(|f| get_finding_detail(&f.code))
        .map(|detail| {
            let category_prefix = match detail.category {
                FindingCategory::Target => "[TARGET] ",
                FindingCategory::Network => "[NET] ",
                FindingCategory::Http => "[HTTP] ",
                FindingCategory::Content => "[PAGE] ",
            };
            let title_style = match detail.severity {
                Severity::Critical => Style::default().fg(Color::Red),
                Severity::Warning => Style::default().fg(Color::Yellow),
                Severity::Info => Style::default().fg(Color::Cyan),
            };
            ListItem::new(Line::from(vec![
                Span::styled(category_prefix, Style::default().fg(Color::DarkGray)),
                Span::styled(detail.title, title_style),
            ]))
        })
        .collect();

    let findings_list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(findings_list, chunks[0], &mut app.analysis_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    let selected = app
        .analysis_list_state
        .selected()
        .and_then(|i| app.all_findings.get(i))
        .and_then(|f| get_finding_detail(&f.code));
    match selected {
        Some(detail) => {
            let text = vec![
                Line::from(""),
                Line::from("WHAT IT IS:".yellow().bold()),
                Line::from(detail.description),
                Line::from(""),
                Line::from("HOW TO FIX:".yellow().bold()),
                Line::from(detail.remediation),
            ];
            let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(detail_block);
            frame.render_widget(p, chunks[1]);
        }
        None => render_placeholder_details(frame, detail_block, chunks[1]),
    }

    if let Some(report) = &app.scan_report {
        let block = Block::default().borders(Borders::TOP).title("Exposure");
        let p = Paragraph::new(exposure_lines(report)).wrap(Wrap { trim: true }).block(block);
        frame.render_widget(p, chunks[2]);
    }
}

fn render_placeholder_details(frame: &mut Frame, block: Block, area: Rect) {
    let placeholder_text = Text::from(vec![
        Line::from(""),
        Line::from("✓ NO ISSUES FOUND".bold().fg(Color::Green)),
        Line::from(""),
        Line::from("No exposed services or missing security headers were detected."),
    ]);
    let p = Paragraph::new(placeholder_text).alignment(Alignment::Center).block(block);
    frame.render_widget(p, area);
}

/// Open ports with their banners, then the header audit, proxy verdict, links and flagged page content.
fn exposure_lines(report: &ReconReport) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = report
        .open_ports
        .iter()
        .map(|p| {
            Line::from(vec![
                Span::styled(format!("{:>5}/tcp ", p.port), Style::default().fg(Color::Green)),
                Span::styled(format!("{:<10} ", p.service_name), Style::default().fg(Color::Cyan)),
                Span::raw(p.banner.clone()),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from("No open ports found.".dark_gray()));
    }
    for (header, presence) in &report.findings.security_header_audit {
        let style = if presence.is_present() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8} ", presence.status()), style),
            Span::raw(header.clone()),
        ]));
    }
    lines.push(Line::from(report.findings.proxy_status.clone()));
    lines.push(Line::from(format!(
        "Links: {} internal, {} external domains, {} edges",
        report.sub_urls.len(),
        report.external_connections.len(),
        report.navigation_map.len()
    )));
    if !report.findings.hidden_inputs.is_empty() {
        lines.push(Line::from(format!("Hidden inputs: {}", report.findings.hidden_inputs.join(", "))));
    }
    for comment in &report.findings.comments {
        lines.push(Line::from(vec![
            Span::styled("<!-- ", Style::default().fg(Color::Yellow)),
            Span::raw(comment.clone()),
            Span::styled(" -->", Style::default().fg(Color::Yellow)),
        ]));
    }
    lines
}
