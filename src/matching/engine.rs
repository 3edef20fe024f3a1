use serde::Serialize;

use super::criteria::Criteria;
use super::factors::{
    round4, score_deal, score_employees, score_industry, score_region, score_revenue, Subscores,
};
use crate::model::Fund;

/// A fund with its composite score and per-factor breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFund {
    #[serde(rename = "fund")]
    pub name: String,
    pub score: f64,
    #[serde(rename = "match")]
    pub record: Fund,
    pub subscores: Subscores,
}

/// Score one fund against the criteria. Never fails: missing fund fields read as empty.
pub fn score_fund(criteria: &Criteria, fund: &Fund) -> ScoredFund {
    let subscores = Subscores {
        industry: score_industry(&criteria.industries, fund),
        region: score_region(&criteria.regions, fund),
        revenue: score_revenue(criteria.revenue_usd.as_ref(), fund),
        employees: score_employees(criteria.employees.as_ref(), fund),
        deal: score_deal(criteria.deal_type.as_deref(), fund),
    };

    // Contributions are summed unrounded; only the composite is rounded.
    let score = round4(subscores.total()).clamp(0.0, 1.0);

    ScoredFund {
        name: fund.name.clone(),
        score,
        record: fund.clone(),
        subscores,
    }
}

/// Score every fund and sort by score descending.
///
/// The sort is stable, so funds with equal scores keep their dataset order.
pub fn rank_funds(criteria: &Criteria, funds: &[Fund]) -> Vec<ScoredFund> {
    let mut ranked: Vec<ScoredFund> = funds.iter().map(|f| score_fund(criteria, f)).collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::debug!(
        funds = ranked.len(),
        top = ranked.first().map(|s| s.name.as_str()).unwrap_or(""),
        top_score = ranked.first().map(|s| s.score).unwrap_or(0.0),
        "ranked funds"
    );

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueRange;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fund(name: &str, industries: &[&str], regions: &[&str], deals: &[&str]) -> Fund {
        Fund {
            name: name.to_string(),
            industries: strings(industries),
            regions: strings(regions),
            deal_types: strings(deals),
            ..Default::default()
        }
    }

    fn software_us_buyout() -> Criteria {
        Criteria {
            industries: strings(&["Software"]),
            regions: strings(&["US"]),
            deal_type: Some("Buyout".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_scores() {
        let funds = vec![
            fund("FundB", &["Industrial"], &["Europe"], &["Growth"]),
            fund("FundA", &["Software"], &["US"], &["Buyout"]),
        ];

        let ranked = rank_funds(&software_us_buyout(), &funds);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "FundA");
        assert_eq!(ranked[0].score, 0.7);
        assert_eq!(ranked[1].name, "FundB");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_full_match_scores_one() {
        let mut f = fund("Full", &["Software"], &["US"], &["Buyout"]);
        f.revenue_focus_usd = ValueRange::between(5_000_000, 50_000_000);
        f.employee_focus = ValueRange::between(10, 200);

        let mut criteria = software_us_buyout();
        criteria.revenue_usd = Some(ValueRange::between(10_000_000, 20_000_000));
        criteria.employees = Some(ValueRange::between(20, 80));

        let scored = score_fund(&criteria, &f);
        assert_eq!(scored.score, 1.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let funds = vec![
            fund("A", &["Software", "Healthcare"], &["US", "Canada"], &["Buyout"]),
            fund("B", &[], &[], &[]),
            fund("C", &["software"], &["us"], &["buyout", "BUYOUT"]),
        ];
        let mut criteria = software_us_buyout();
        criteria.industries = strings(&["Software", "Healthcare", "Consumer"]);

        for scored in rank_funds(&criteria, &funds) {
            assert!((0.0..=1.0).contains(&scored.score), "{}", scored.score);
        }
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let funds = vec![
            fund("A", &["Software"], &["Europe"], &["Buyout"]),
            fund("B", &["Software"], &["US"], &["Growth"]),
            fund("C", &["Consumer"], &["US"], &["Buyout"]),
        ];
        let first = rank_funds(&software_us_buyout(), &funds);
        let second = rank_funds(&software_us_buyout(), &funds);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_keep_dataset_order() {
        let funds = vec![
            fund("Low", &["Consumer"], &["Europe"], &["Growth"]),
            fund("Tie1", &["Software"], &["US"], &["Buyout"]),
            fund("Tie2", &["Software"], &["US"], &["Buyout"]),
            fund("Tie3", &["Software"], &["US"], &["Buyout"]),
        ];
        let names: Vec<String> = rank_funds(&software_us_buyout(), &funds)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, strings(&["Tie1", "Tie2", "Tie3", "Low"]));
    }

    #[test]
    fn test_empty_criteria_scores_zero() {
        let funds = vec![fund("A", &["Software"], &["US"], &["Buyout"])];
        let ranked = rank_funds(&Criteria::default(), &funds);
        assert_eq!(ranked[0].score, 0.0);
        assert!(ranked[0].subscores.iter().all(|(_, s)| !s.applied));
    }

    #[test]
    fn test_empty_dataset() {
        assert!(rank_funds(&software_us_buyout(), &[]).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let scored = score_fund(
            &software_us_buyout(),
            &fund("A", &["Software"], &["US"], &["Buyout"]),
        );
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["fund"], "A");
        assert_eq!(value["match"]["name"], "A");
        assert_eq!(value["subscores"]["industry"]["contribution"], 0.4);
        assert_eq!(value["subscores"]["revenue"]["applied"], false);
    }
}
