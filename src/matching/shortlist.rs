use std::path::Path;

use serde::Serialize;

use super::criteria::Criteria;
use super::engine::{rank_funds, ScoredFund};
use super::factors::{Factor, Subscores};
use crate::model::{CompanyProfile, Fund, FundDataset, InputError};

pub const DEFAULT_TOP_K: usize = 5;

/// Funds scoring below this never make the shortlist.
pub const SCORE_THRESHOLD: f64 = 0.2;

const FALLBACK_REASON: &str = "generalist flexibility";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rationale {
    pub summary: String,
    pub subscores: Subscores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortlistEntry {
    pub fund: String,
    pub score: f64,
    pub rationale: Rationale,
}

/// Short reason string built from the factors that scored above zero.
///
/// Deal type never appears here; it is explained separately.
pub fn rationale_summary(subscores: &Subscores) -> String {
    let reasons: Vec<&str> = subscores
        .iter()
        .filter(|(_, s)| s.is_positive())
        .filter_map(|(factor, _)| match factor {
            Factor::Industry => Some("industry fit"),
            Factor::Region => Some("region fit"),
            Factor::Revenue => Some("revenue range compatible"),
            Factor::Employees => Some("employee range compatible"),
            Factor::Deal => None,
        })
        .collect();

    if reasons.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        reasons.join(", ")
    }
}

/// Apply the score threshold to a full ranking, then cut to `top_k`.
///
/// Filtering happens before truncation so the list is only short when fewer than
/// `top_k` funds clear the threshold.
pub fn select(ranked: Vec<ScoredFund>, top_k: usize) -> Vec<ShortlistEntry> {
    ranked
        .into_iter()
        .filter(|s| s.score >= SCORE_THRESHOLD)
        .take(top_k)
        .map(|s| ShortlistEntry {
            rationale: Rationale {
                summary: rationale_summary(&s.subscores),
                subscores: s.subscores,
            },
            fund: s.name,
            score: s.score,
        })
        .collect()
}

/// Rank the dataset against criteria derived from the profile and keep the best `top_k`.
pub fn shortlist(profile: &CompanyProfile, funds: &[Fund], top_k: usize) -> Vec<ShortlistEntry> {
    let criteria = Criteria::from_profile(profile);
    tracing::debug!(
        industries = ?criteria.industries,
        regions = ?criteria.regions,
        "derived match criteria"
    );

    let entries = select(rank_funds(&criteria, funds), top_k);
    tracing::info!(
        candidates = funds.len(),
        selected = entries.len(),
        top_k,
        "built shortlist"
    );
    entries
}

/// Load the dataset from disk and shortlist against it. Load failures are reported,
/// never turned into an empty shortlist.
pub fn shortlist_from_path(
    profile: &CompanyProfile,
    dataset: &Path,
    top_k: usize,
) -> Result<Vec<ShortlistEntry>, InputError> {
    let dataset = FundDataset::load(dataset)?;
    Ok(shortlist(profile, dataset.funds(), top_k))
}
