use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::explain::{factor_details, format_count_range, format_money_range, fund_summary};
use crate::pipeline::ExtractionMode;
use crate::tui::app::{App, InputMode};
use crate::tui::theme::ThemeColors;

const TITLE: &str = "PE Shortlist";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 10 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Profile(4) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(4), // Company profile
        Constraint::Fill(1),   // Shortlist table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_profile(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::Breakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }

    // Loading overlay appears on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        TITLE,
        Style::default().fg(theme.title_color).bold(),
    )];

    // Extraction mode on the right
    if let Some(report) = &app.report {
        let mode = match &report.extraction.mode {
            ExtractionMode::Llm { model } => format!("model: {}", model),
            ExtractionMode::Heuristic { reason } => format!("heuristic ({})", reason),
        };
        let mode = if report.extraction.cached {
            format!("{} | cached page", mode)
        } else {
            mode
        };
        let padding_len = (area.width as usize).saturating_sub(TITLE.len() + mode.chars().count());
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(mode, Style::default().fg(theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_profile(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.label_color));
    let muted = Style::default().fg(theme.muted);

    let lines = match &app.report {
        None => vec![Line::from(Span::styled(app.request.url.clone(), muted))],
        Some(report) => {
            let profile = &report.company_profile;
            let name = if profile.company_name.trim().is_empty() {
                "Unknown".to_string()
            } else {
                profile.company_name.clone()
            };
            let join = |items: &[String]| {
                if items.is_empty() {
                    "-".to_string()
                } else {
                    items.join(", ")
                }
            };

            vec![
                Line::from(vec![
                    Span::styled(name, Style::default().bold()),
                    Span::raw("  "),
                    Span::styled(app.company_url().to_string(), muted.underlined()),
                    Span::styled(
                        format!("  confidence {:.0}%", profile.confidence * 100.0),
                        muted,
                    ),
                ]),
                Line::from(vec![
                    label("Industries: "),
                    Span::raw(join(&profile.industries)),
                    Span::raw("   "),
                    label("Locations: "),
                    Span::raw(join(&profile.locations)),
                ]),
                Line::from(vec![
                    label("Revenue: "),
                    Span::raw(format_money_range(profile.revenue_range_usd.as_ref())),
                    Span::raw("   "),
                    label("Employees: "),
                    Span::raw(format_count_range(profile.employee_count_range.as_ref())),
                ]),
                Line::from(Span::styled(profile.summary.clone(), muted)),
            ]
        }
    };

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let entries = app.entries();

    if entries.is_empty() {
        let msg = if app.report.is_some() {
            "No funds cleared the score threshold"
        } else {
            ""
        };
        let empty_msg = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index = format!("{}.", idx + 1);

            let mut score_spans = vec![Span::styled(
                format!("{:.2} ", entry.score),
                Style::default().fg(theme.score_color(entry.score)),
            )];
            score_spans.extend(score_bar(entry.score, 10, theme).spans);

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(truncate(&entry.fund, 40)),
                Cell::from(entry.rationale.summary.clone()),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(16), // Score + bar: "0.70 ███████░░░"
        Constraint::Length(32), // Fund
        Constraint::Fill(1),    // Rationale
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Score", "Fund", "Why"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.contains("timed out") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = format!("{} funds", app.entries().len());

        let elapsed = app.last_refresh.elapsed();
        let refresh_time = if elapsed.as_secs() < 60 {
            format!("analysed {}s ago", elapsed.as_secs())
        } else {
            format!("analysed {}m ago", elapsed.as_secs() / 60)
        };

        let hints = [
            ("j/k", ":nav "),
            ("b", ":breakdown "),
            ("o", ":open site "),
            ("r", ":re-run "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(count, Style::default().fg(theme.muted)),
            Span::raw(" "),
            Span::styled(refresh_time, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

fn score_bar(score: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let filled = (score.clamp(0.0, 1.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.score_color(score)),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme.bar_empty),
        ));
    }

    Line::from(spans)
}

fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Per-factor details for the selected fund
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(entry) = app.selected_entry() else {
        return;
    };
    let theme = &app.theme;
    let subscores = &entry.rationale.subscores;

    let mut lines = Vec::new();
    for (factor, subscore) in subscores.iter() {
        let points = if subscore.applied {
            format!("+{:.2} / {}", subscore.contribution, subscore.weight)
        } else {
            "skipped".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10}", factor.label()),
                Style::default().fg(theme.label_color).bold(),
            ),
            Span::styled(points, Style::default().fg(theme.muted)),
        ]));
        lines.push(Line::from(format!("  {}", factor_details(factor, subscore))));
    }

    let summary = fund_summary(entry.score, subscores);
    lines.push(Line::from(""));
    for bullet in summary.bullets {
        lines.push(Line::from(format!("- {}", bullet)));
    }
    lines.push(Line::from(Span::styled(
        summary.conclusion,
        Style::default().bold(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc/b: close  j/k: next fund",
        Style::default().fg(theme.muted),
    )));

    let area = frame.area();
    let popup_area = centered_rect_fixed(area.width.saturating_sub(8).min(100), 24, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(
            format!(" {} ({:.2}) ", entry.fund, entry.score),
            theme.popup_title,
        ))
        .border_style(Style::default().fg(theme.popup_border));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 12, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let shortcuts = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("b / Enter     ", "Score breakdown"),
        ("o             ", "Open company website"),
        ("r             ", "Re-run the analysis"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the loading spinner overlay
fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(34, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let text = if app.report.is_none() {
        format!("{} Analysing website...", spinner)
    } else {
        format!("{} Re-running analysis...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));
    frame.render_widget(loading_text, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_score_bar_fill() {
        let theme = ThemeColors::dark();
        assert_eq!(bar_text(&score_bar(0.7, 10, &theme)), "███████░░░");
        assert_eq!(bar_text(&score_bar(0.0, 4, &theme)), "░░░░");
        assert_eq!(bar_text(&score_bar(1.0, 4, &theme)), "████");
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(50, 4, area);
        assert_eq!(rect, Rect::new(0, 3, 20, 4));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Summit Ridge Partners", 10), "Summit ...");
        assert_eq!(truncate("Short", 10), "Short");
    }
}
