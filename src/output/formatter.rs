use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::explain::{
    factor_details, format_count_range, format_money_range, fund_summary, profile_insights,
};
use crate::matching::{rationale_summary, ScoredFund, ShortlistEntry, Subscores};
use crate::model::CompanyProfile;

const EMPTY_SHORTLIST: &str = "No funds cleared the score threshold.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Composite scores are in [0, 1]; two decimals is what people read.
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// One display row: a fund, its score and a short reason.
pub struct ScoredRow<'a> {
    pub fund: &'a str,
    pub score: f64,
    pub summary: String,
}

impl<'a> From<&'a ShortlistEntry> for ScoredRow<'a> {
    fn from(entry: &'a ShortlistEntry) -> Self {
        Self {
            fund: &entry.fund,
            score: entry.score,
            summary: entry.rationale.summary.clone(),
        }
    }
}

impl<'a> From<&'a ScoredFund> for ScoredRow<'a> {
    fn from(scored: &'a ScoredFund) -> Self {
        Self {
            fund: &scored.name,
            score: scored.score,
            summary: rationale_summary(&scored.subscores),
        }
    }
}

/// Format the company profile as a labelled block.
pub fn format_profile(profile: &CompanyProfile, use_colors: bool) -> String {
    let name = if profile.company_name.trim().is_empty() {
        "Unknown"
    } else {
        profile.company_name.as_str()
    };
    let or_dash = |items: &[String]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };
    let summary = if profile.summary.trim().is_empty() {
        "-"
    } else {
        profile.summary.trim()
    };

    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!("{}  {}", name.bold(), profile.url.underline()));
    } else {
        lines.push(format!("{}  {}", name, profile.url));
    }
    lines.push(format!("  Confidence: {:.0}%", profile.confidence * 100.0));
    lines.push(format!(
        "  Revenue (est): {}",
        format_money_range(profile.revenue_range_usd.as_ref())
    ));
    lines.push(format!(
        "  Employees (est): {}",
        format_count_range(profile.employee_count_range.as_ref())
    ));
    lines.push(format!("  Industries: {}", or_dash(&profile.industries)));
    lines.push(format!("  Locations: {}", or_dash(&profile.locations)));
    lines.push(format!("  Summary: {}", summary));

    if !profile.offerings.is_empty() {
        lines.push("  Offerings:".to_string());
        for (i, offering) in profile.offerings.iter().take(10).enumerate() {
            lines.push(format!("    {}. {}", i + 1, offering));
        }
    }

    lines.push("  Key insights:".to_string());
    for insight in profile_insights(profile) {
        lines.push(format!("    - {}", insight));
    }

    lines.join("\n")
}

/// Format funds as a ranked table with columns: Index, Score, Fund, Rationale
/// No headers
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_scored_table(rows: &[ScoredRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return EMPTY_SHORTLIST.to_string();
    }

    let term_width = get_terminal_width();
    let fund_width = rows
        .iter()
        .map(|r| r.fund.chars().count())
        .max()
        .unwrap_or(0)
        .min(40);

    let index_width = 3;
    let score_width = 4;
    let separator = "  ";

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            // 1-based index, right-aligned with trailing dot
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(row.score);
            let fund = format!(
                "{:<width$}",
                truncate_title(row.fund, fund_width),
                width = fund_width
            );

            let fixed_width = index_width + 1 + score_width + separator.len() * 2 + fund_width;
            let summary = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_title(&row.summary, width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate_title(&row.summary, 20),
                // No terminal (pipe), don't truncate
                None => row.summary.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    fund.cyan(),
                    separator,
                    summary
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_str, separator, fund, separator, summary
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format funds as tab-separated values for scripting
/// Columns: score, fund, rationale (no headers, no colors)
pub fn format_tsv(rows: &[ScoredRow]) -> String {
    rows.iter()
        .map(|row| format!("{:.4}\t{}\t{}", row.score, row.fund, row.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-factor breakdown for one fund, followed by summary bullets and a conclusion.
pub fn format_breakdown(fund: &str, score: f64, subscores: &Subscores, use_colors: bool) -> String {
    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!("{}  {}", fund.bold(), format_score(score).bold()));
    } else {
        lines.push(format!("{}  {}", fund, format_score(score)));
    }

    for (factor, subscore) in subscores.iter() {
        let contribution = if subscore.applied {
            format!("+{:.4} of {}", subscore.contribution, subscore.weight)
        } else {
            format!("skipped (weight {})", subscore.weight)
        };
        let label = format!("{:<10}", factor.label());
        let label = if use_colors {
            label.bold().to_string()
        } else {
            label
        };
        lines.push(format!("  {} {}", label, contribution));
        lines.push(format!("             {}", factor_details(factor, subscore)));
    }

    let summary = fund_summary(score, subscores);
    for bullet in &summary.bullets {
        lines.push(format!("  - {}", bullet));
    }
    lines.push(format!("  {}", summary.conclusion));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{rank_funds, shortlist, Criteria};
    use crate::model::{Fund, ValueRange};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn funds() -> Vec<Fund> {
        vec![
            Fund {
                name: "Summit Ridge Partners".to_string(),
                industries: strings(&["Software"]),
                regions: strings(&["US"]),
                deal_types: strings(&["Buyout"]),
                ..Default::default()
            },
            Fund {
                name: "Harbor Lane".to_string(),
                industries: strings(&["Consumer"]),
                regions: strings(&["US"]),
                deal_types: strings(&["Growth"]),
                ..Default::default()
            },
        ]
    }

    fn profile() -> CompanyProfile {
        CompanyProfile {
            company_name: "Acme".to_string(),
            url: "https://acme.example".to_string(),
            industries: strings(&["Software"]),
            locations: strings(&["Austin, Texas"]),
            revenue_range_usd: Some(ValueRange::between(5_000_000, 80_000_000)),
            employee_count_range: Some(ValueRange::between(10, 500)),
            offerings: strings(&["Fleet software"]),
            summary: "Acme makes fleet software".to_string(),
            confidence: 0.45,
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.7), "0.70");
        assert_eq!(format_score(0.0), "0.00");
        assert_eq!(format_score(1.0), "1.00");
    }

    #[test]
    fn test_truncate_title_long() {
        assert_eq!(truncate_title("This is a very long title", 15), "This is a ve...");
        assert_eq!(truncate_title("Short", 20), "Short");
        assert_eq!(truncate_title("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_profile() {
        let result = format_profile(&profile(), false);
        assert!(result.starts_with("Acme  https://acme.example"));
        assert!(result.contains("Confidence: 45%"));
        assert!(result.contains("Revenue (est): $5.0M - $80.0M"));
        assert!(result.contains("Employees (est): 10 - 500"));
        assert!(result.contains("    1. Fleet software"));
        assert!(result.contains("    - Sector focus: Software"));
    }

    #[test]
    fn test_format_profile_unknown_name() {
        let result = format_profile(&CompanyProfile::default(), false);
        assert!(result.starts_with("Unknown"));
        assert!(result.contains("Revenue (est): -"));
        assert!(result.contains("Industries: -"));
    }

    #[test]
    fn test_format_scored_table_empty() {
        assert_eq!(format_scored_table(&[], false), EMPTY_SHORTLIST);
    }

    #[test]
    fn test_format_scored_table_rows() {
        let entries = shortlist(&profile(), &funds(), 5);
        let rows: Vec<ScoredRow> = entries.iter().map(ScoredRow::from).collect();
        let result = format_scored_table(&rows, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. 1.00  Summit Ridge Partners"));
        assert!(lines[1].starts_with(" 2. 0.50  Harbor Lane"));
    }

    #[test]
    fn test_format_tsv() {
        let ranked = rank_funds(
            &Criteria {
                industries: strings(&["Software"]),
                regions: strings(&["US"]),
                deal_type: Some("Buyout".to_string()),
                ..Default::default()
            },
            &funds(),
        );
        let rows: Vec<ScoredRow> = ranked.iter().map(ScoredRow::from).collect();
        assert_eq!(
            format_tsv(&rows),
            "0.7000\tSummit Ridge Partners\tindustry fit, region fit\n\
             0.2000\tHarbor Lane\tregion fit"
        );
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_breakdown() {
        let entries = shortlist(&profile(), &funds(), 1);
        let entry = &entries[0];
        let result = format_breakdown(&entry.fund, entry.score, &entry.rationale.subscores, false);
        assert!(result.starts_with("Summit Ridge Partners  1.00"));
        assert!(result.contains("  Industry   +0.4000 of 0.4"));
        assert!(result.contains("Industry overlap 1/1."));
        assert!(result.contains("Deal type: MATCH"));
        assert!(result.contains("Conclusion: Overall alignment is strong"));
    }
}
