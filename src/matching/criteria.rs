use serde::Serialize;

use crate::model::{CompanyProfile, ValueRange};

/// Deal type assumed for every SMB exit.
pub const DEFAULT_DEAL_TYPE: &str = "Buyout";

/// Canonical buyer regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionLabel {
    Us,
    Canada,
    Europe,
}

impl RegionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionLabel::Us => "US",
            RegionLabel::Canada => "Canada",
            RegionLabel::Europe => "Europe",
        }
    }
}

/// Used when no location matches any trigger. Biases demos toward US buyers.
pub const DEFAULT_REGION: RegionLabel = RegionLabel::Us;

/// Label -> trigger substrings, checked top to bottom against each lowercased location.
/// The first label with any matching trigger wins for that location.
pub const REGION_TRIGGERS: &[(RegionLabel, &[&str])] = &[
    (
        RegionLabel::Us,
        &["united states", "usa", "us", "california", "texas", "ny", "new york"],
    ),
    (RegionLabel::Canada, &["canada", "ontario", "quebec"]),
    (
        RegionLabel::Europe,
        &["uk", "united kingdom", "england", "london", "europe"],
    ),
];

/// Map free-text locations to canonical region labels.
///
/// One label at most per location, in location order, deduplicated keeping the first
/// occurrence. Falls back to [`DEFAULT_REGION`] when nothing matches.
pub fn infer_regions(locations: &[String]) -> Vec<RegionLabel> {
    let mut labels: Vec<RegionLabel> = Vec::new();

    for location in locations {
        let text = location.to_lowercase();
        let matched = REGION_TRIGGERS
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
            .map(|(label, _)| *label);

        if let Some(label) = matched {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }

    if labels.is_empty() {
        labels.push(DEFAULT_REGION);
    }
    labels
}

/// What the ranking engine matches funds against.
///
/// Empty lists and `None` mean "criterion absent": that factor is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Criteria {
    pub industries: Vec<String>,

    pub regions: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_usd: Option<ValueRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<ValueRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_type: Option<String>,
}

impl Criteria {
    /// Derive matching criteria from an extracted company profile.
    pub fn from_profile(profile: &CompanyProfile) -> Self {
        let regions = infer_regions(&profile.locations)
            .into_iter()
            .map(|label| label.as_str().to_string())
            .collect();

        Self {
            industries: profile.industries.clone(),
            regions,
            revenue_usd: profile.revenue_range_usd.and_then(ValueRange::specified),
            employees: profile.employee_count_range.and_then(ValueRange::specified),
            deal_type: Some(DEFAULT_DEAL_TYPE.to_string()),
        }
    }
}
