//! Deal-type adjacency for explanations.
//!
//! Scoring only credits an exact deal-type match. This table lets the explanation say
//! when a fund lists something close to what the company wants, without touching the score.

use super::format::join_or_placeholder;

/// Requested deal type -> fund deal types that are close enough to mention.
const DEAL_ADJACENCY: &[(&str, &[&str])] = &[
    ("buyout", &["buyout", "lbo", "control", "majority"]),
    ("majority", &["majority", "control", "buyout"]),
    (
        "minority",
        &["minority", "non-control", "growth minority", "minority growth"],
    ),
    ("growth", &["growth", "growth equity", "minority"]),
    ("carve-out", &["carve-out", "carveout", "divestiture"]),
    (
        "roll-up",
        &["roll-up", "rollup", "buy-and-build", "add-on", "platform"],
    ),
    ("recap", &["recap", "recapitalization"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealAlignment {
    NotSpecified,
    Match,
    NearMatch,
    Mismatch,
}

impl DealAlignment {
    pub fn label(&self) -> &'static str {
        match self {
            DealAlignment::NotSpecified => "not specified",
            DealAlignment::Match => "MATCH",
            DealAlignment::NearMatch => "NEAR MATCH",
            DealAlignment::Mismatch => "MISMATCH",
        }
    }
}

/// Adjacent deal types for a normalized request, including the request itself.
/// Unknown types are adjacent only to themselves.
pub fn adjacent_deal_types(requested: &str) -> Vec<String> {
    let mut adjacent: Vec<String> = DEAL_ADJACENCY
        .iter()
        .find(|(key, _)| *key == requested)
        .map(|(_, near)| near.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| vec![requested.to_string()]);
    adjacent.sort();
    adjacent
}

/// Classify how a fund's deal types line up with the requested one.
///
/// `scored_match` is whether the numeric scorer credited the deal factor.
pub fn assess_deal(requested: Option<&str>, fund_deal_types: &[String], scored_match: bool) -> DealAlignment {
    let Some(requested) = requested
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
    else {
        return DealAlignment::NotSpecified;
    };

    if scored_match {
        return DealAlignment::Match;
    }

    let adjacent = adjacent_deal_types(&requested);
    let near = fund_deal_types
        .iter()
        .any(|d| adjacent.contains(&d.trim().to_lowercase()));

    if near {
        DealAlignment::NearMatch
    } else {
        DealAlignment::Mismatch
    }
}

/// Long sentence and short bullet for one fund's deal alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct DealNote {
    pub alignment: DealAlignment,
    pub long: String,
    pub bullet: String,
}

pub fn deal_note(
    requested: Option<&str>,
    fund_deal_types: &[String],
    scored_match: bool,
    weight: f64,
    contribution: f64,
) -> DealNote {
    let alignment = assess_deal(requested, fund_deal_types, scored_match);
    let funds = join_or_placeholder(fund_deal_types);
    let requested = requested.map(str::trim).unwrap_or_default();

    let (long, bullet) = match alignment {
        DealAlignment::NotSpecified => (
            format!(
                "No explicit deal type provided for the company; fund supports {funds}. \
                 This factor did not influence scoring (weight {weight})."
            ),
            "Deal type: not specified (factor ignored)".to_string(),
        ),
        DealAlignment::Match => (
            format!(
                "Company requests '{requested}'; fund mandate includes {funds}. \
                 Alignment: MATCH, requested deal type is explicitly supported \
                 (contribution +{contribution:.3}, weight {weight})."
            ),
            format!("Deal type: MATCH, requested '{requested}' supported (fund: {funds})"),
        ),
        DealAlignment::NearMatch => {
            let adjacent = adjacent_deal_types(&requested.to_lowercase()).join(", ");
            (
                format!(
                    "Company requests '{requested}'; fund mandate is {funds}. \
                     No exact listing for the requested type, but adjacent options are supported \
                     (e.g., {requested} ~ {adjacent}). Alignment: NEAR MATCH, contribution remains 0 \
                     due to strict criteria (weight {weight}), but the fund may accommodate \
                     depending on flexibility."
                ),
                format!(
                    "Deal type: NEAR MATCH, requested '{requested}' not listed; adjacent options present (fund: {funds})"
                ),
            )
        }
        DealAlignment::Mismatch => (
            format!(
                "Company requests '{requested}'; fund mandate is {funds}. \
                 Alignment: MISMATCH, requested deal type is not represented; \
                 contribution 0 of weight {weight}."
            ),
            format!("Deal type: MISMATCH, requested '{requested}' not in fund mandate (fund: {funds})"),
        ),
    };

    DealNote {
        alignment,
        long,
        bullet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_not_specified() {
        assert_eq!(assess_deal(None, &strings(&["Buyout"]), false), DealAlignment::NotSpecified);
        assert_eq!(assess_deal(Some(" "), &[], false), DealAlignment::NotSpecified);
    }

    #[test]
    fn test_match_follows_scorer() {
        assert_eq!(
            assess_deal(Some("Buyout"), &strings(&["Buyout"]), true),
            DealAlignment::Match
        );
    }

    #[test]
    fn test_near_match_via_adjacency() {
        assert_eq!(
            assess_deal(Some("Buyout"), &strings(&["Majority", "Growth"]), false),
            DealAlignment::NearMatch
        );
        assert_eq!(
            assess_deal(Some("Growth"), &strings(&["Minority"]), false),
            DealAlignment::NearMatch
        );
    }

    #[test]
    fn test_adjacency_is_not_symmetric() {
        // Minority lists growth minority, not plain growth.
        assert_eq!(
            assess_deal(Some("Minority"), &strings(&["Growth"]), false),
            DealAlignment::Mismatch
        );
    }

    #[test]
    fn test_mismatch() {
        assert_eq!(
            assess_deal(Some("Buyout"), &strings(&["Growth", "Minority"]), false),
            DealAlignment::Mismatch
        );
    }

    #[test]
    fn test_unknown_type_only_adjacent_to_itself() {
        assert_eq!(adjacent_deal_types("pipe"), vec!["pipe".to_string()]);
        assert_eq!(
            assess_deal(Some("PIPE"), &strings(&["pipe"]), false),
            DealAlignment::NearMatch
        );
    }

    #[test]
    fn test_deal_note_text() {
        let note = deal_note(Some("Buyout"), &strings(&["Buyout", "Recap"]), true, 0.1, 0.1);
        assert_eq!(note.alignment, DealAlignment::Match);
        assert!(note.long.contains("contribution +0.100, weight 0.1"));
        assert_eq!(
            note.bullet,
            "Deal type: MATCH, requested 'Buyout' supported (fund: Buyout, Recap)"
        );

        let note = deal_note(Some("Buyout"), &strings(&["Control"]), false, 0.1, 0.0);
        assert_eq!(note.alignment, DealAlignment::NearMatch);
        assert!(note.long.contains("buyout, control, lbo, majority"));

        let note = deal_note(None, &[], false, 0.1, 0.0);
        assert!(note.long.contains("fund supports -"));
        assert_eq!(note.bullet, "Deal type: not specified (factor ignored)");
    }
}
