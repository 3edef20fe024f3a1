use crate::model::ValueRange;

const PLACEHOLDER: &str = "-";

/// Compact dollar amount: `$1.2B`, `$25.0M`, `$500k`, `$900`.
pub fn format_money(value: i64) -> String {
    let v = value as f64;
    if v >= 1_000_000_000.0 {
        format!("${:.1}B", v / 1_000_000_000.0)
    } else if v >= 1_000_000.0 {
        format!("${:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("${:.0}k", v / 1_000.0)
    } else {
        format!("${}", value)
    }
}

fn bound(value: Option<i64>, fmt: impl Fn(i64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "?".to_string())
}

/// `$5.0M - $80.0M`; unknown bounds print as `?`, a missing or unbounded range as `-`.
pub fn format_money_range(range: Option<&ValueRange>) -> String {
    match range {
        Some(r) if !r.is_unbounded() => {
            format!("{} - {}", bound(r.min, format_money), bound(r.max, format_money))
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// `10 - 500`; unknown bounds print as `?`, a missing or unbounded range as `-`.
pub fn format_count_range(range: Option<&ValueRange>) -> String {
    match range {
        Some(r) if !r.is_unbounded() => {
            format!("{} - {}", bound(r.min, |v| v.to_string()), bound(r.max, |v| v.to_string()))
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Human wording for a coverage ratio.
pub fn coverage_phrase(coverage: Option<f64>) -> String {
    match coverage {
        None => "coverage unavailable".to_string(),
        Some(c) if c >= 0.95 => "fully covered".to_string(),
        Some(c) if c >= 0.75 => format!("mostly covered (~{:.0}%)", c * 100.0),
        Some(c) if c > 0.0 => format!("partially covered (~{:.0}%)", c * 100.0),
        Some(_) => "no overlap".to_string(),
    }
}

/// Comma-joined list, `-` when empty.
pub fn join_or_placeholder(items: &[String]) -> String {
    if items.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        items.join(", ")
    }
}
