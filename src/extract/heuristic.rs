//! Keyword heuristics for building a profile without a model.
//!
//! Good enough for demos and offline runs. Size bands are fixed guesses, which is why
//! the confidence is low.

use super::page::FetchedPage;
use crate::model::{CompanyProfile, ValueRange};

pub const HEURISTIC_CONFIDENCE: f64 = 0.45;
const DEFAULT_INDUSTRY: &str = "Business Services";
const DEFAULT_LOCATION: &str = "United States";
const MAX_OFFERINGS: usize = 5;
const OFFERING_CHARS: usize = 140;
const SUMMARY_CHARS: usize = 280;
/// How far past a keyword to look for the end of its sentence.
const SENTENCE_LOOKAHEAD: usize = 240;

/// Industry label -> keywords, checked in order. Every matching label is kept.
const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Software", &["saas", "software", "platform", "cloud"]),
    (
        "Tech-Enabled Services",
        &["managed service", "it services", "digital"],
    ),
    (
        "Industrial",
        &["manufacturing", "industrial", "plant", "fabrication"],
    ),
    ("Healthcare", &["clinic", "patient", "medical", "healthcare"]),
    ("Consumer", &["ecommerce", "retail", "brand", "store", "shop"]),
    (
        "Business Services",
        &["b2b", "consulting", "outsourcing", "agency"],
    ),
];

const LOCATION_TOKENS: &[&str] = &["United States", "USA", "US", "Canada", "United Kingdom", "Europe"];

const OFFERING_KEYWORDS: &[&str] = &["products", "services", "solutions", "platform"];

/// Title separators, in priority order. The first one present splits the title.
const TITLE_SEPARATORS: &[&str] = &["|", "\u{2013}", "-", "::", ":"];

pub fn extract_profile(url: &str, page: &FetchedPage) -> CompanyProfile {
    let title = page.title.as_deref().unwrap_or_default().trim();
    let text = page.text.trim().to_lowercase();

    let offerings = detect_offerings(&text);
    let summary = if !title.is_empty() {
        truncate_chars(title, SUMMARY_CHARS)
    } else {
        offerings
            .first()
            .map(|o| truncate_chars(o, SUMMARY_CHARS))
            .unwrap_or_default()
    };

    let profile = CompanyProfile {
        company_name: company_name(title, url),
        url: url.to_string(),
        industries: detect_industries(&text),
        locations: detect_locations(&text),
        employee_count_range: Some(ValueRange::between(10, 500)),
        revenue_range_usd: Some(ValueRange::between(5_000_000, 80_000_000)),
        offerings,
        summary,
        confidence: HEURISTIC_CONFIDENCE,
    };
    tracing::debug!(
        company = %profile.company_name,
        industries = ?profile.industries,
        "built heuristic profile"
    );
    profile
}

/// Leading title segment, else the URL host.
pub fn company_name(title: &str, url: &str) -> String {
    let name = TITLE_SEPARATORS
        .iter()
        .find(|sep| title.contains(*sep))
        .and_then(|sep| title.split(*sep).next())
        .unwrap_or(title)
        .trim();

    if !name.is_empty() {
        return name.to_string();
    }

    let without_scheme = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// `text` must already be lowercased.
fn detect_industries(text: &str) -> Vec<String> {
    let industries: Vec<String> = INDUSTRY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(label, _)| label.to_string())
        .collect();

    if industries.is_empty() {
        vec![DEFAULT_INDUSTRY.to_string()]
    } else {
        industries
    }
}

/// `text` must already be lowercased.
fn detect_locations(text: &str) -> Vec<String> {
    let locations: Vec<String> = LOCATION_TOKENS
        .iter()
        .filter(|token| text.contains(&token.to_lowercase()))
        .map(|token| token.to_string())
        .collect();

    if locations.is_empty() {
        vec![DEFAULT_LOCATION.to_string()]
    } else {
        locations
    }
}

/// `text` must already be lowercased.
fn detect_offerings(text: &str) -> Vec<String> {
    OFFERING_KEYWORDS
        .iter()
        .filter_map(|kw| first_sentence_with(text, kw))
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(&s, OFFERING_CHARS))
        .take(MAX_OFFERINGS)
        .collect()
}

/// The sentence around the first occurrence of `keyword`, capitalized.
fn first_sentence_with(text: &str, keyword: &str) -> Option<String> {
    let at = text.find(keyword)?;
    let start = text[..at].rfind('.').map(|i| i + 1).unwrap_or(0);
    let end = text[at..].find('.').map(|i| at + i).unwrap_or_else(|| {
        let mut end = (at + SENTENCE_LOOKAHEAD).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        end
    });
    Some(capitalize(text[start..end].trim()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
