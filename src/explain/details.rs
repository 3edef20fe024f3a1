use super::deal::{deal_note, DealAlignment};
use super::format::{
    coverage_phrase, format_count_range, format_money_range, join_or_placeholder,
};
use crate::matching::{Factor, FactorDetail, Subscore, Subscores};
use crate::model::CompanyProfile;

/// One sentence describing how a factor was scored.
pub fn factor_details(factor: Factor, subscore: &Subscore) -> String {
    match (&subscore.detail, factor) {
        (
            Some(FactorDetail::Industry {
                overlap_count,
                company_count,
                company_industries,
                fund_industries,
            }),
            _,
        ) => format!(
            "Industry overlap {overlap_count}/{company_count}. Company: {}. Fund: {}.",
            join_or_placeholder(company_industries),
            join_or_placeholder(fund_industries)
        ),
        (
            Some(FactorDetail::Region {
                overlap_count,
                company_regions,
                fund_regions,
            }),
            _,
        ) => format!(
            "Regional alignment {} (overlap={overlap_count}). Company regions: {}. Fund regions: {}.",
            if subscore.is_positive() { "yes" } else { "no" },
            join_or_placeholder(company_regions),
            join_or_placeholder(fund_regions)
        ),
        (
            Some(FactorDetail::Range {
                binary_fit,
                coverage_ratio,
                company_range,
                ..
            }),
            factor,
        ) => {
            let place = if *binary_fit >= 1.0 { "within" } else { "outside" };
            let coverage = coverage_phrase(*coverage_ratio);
            if factor == Factor::Revenue {
                format!(
                    "Company revenue {} is {place} the fund's target range ({coverage}).",
                    format_money_range(Some(company_range))
                )
            } else {
                format!(
                    "Company headcount {} is {place} the fund's preferred band ({coverage}).",
                    format_count_range(Some(company_range))
                )
            }
        }
        (
            Some(FactorDetail::Deal {
                company_deal_type,
                fund_deal_types,
            }),
            _,
        ) => {
            deal_note(
                Some(company_deal_type.as_str()),
                fund_deal_types,
                subscore.is_positive(),
                subscore.weight,
                subscore.contribution,
            )
            .long
        }
        (None, Factor::Deal) => {
            deal_note(None, &[], false, subscore.weight, subscore.contribution).long
        }
        (None, factor) => format!(
            "No company {} signal; factor ignored (weight {}).",
            factor.key(),
            subscore.weight
        ),
    }
}

/// Bullets and a one-line conclusion for a shortlisted fund.
#[derive(Debug, Clone, PartialEq)]
pub struct FundSummary {
    pub bullets: Vec<String>,
    pub conclusion: String,
}

fn band_bullet(label: &str, subscore: &Subscore) -> Option<String> {
    let Some(FactorDetail::Range {
        binary_fit,
        coverage_ratio,
        ..
    }) = &subscore.detail
    else {
        return None;
    };

    let place = if *binary_fit >= 1.0 { "within" } else { "outside" };
    let coverage = match coverage_ratio {
        Some(c) if *c >= 0.95 => "fully covered".to_string(),
        Some(c) => format!("~{:.0}% covered", c * 100.0),
        None => "coverage unavailable".to_string(),
    };
    Some(format!("{label}: {place} focus ({coverage})"))
}

pub fn fund_summary(score: f64, subscores: &Subscores) -> FundSummary {
    let mut bullets = Vec::new();
    let mut deal_misaligned = false;

    if let Some(FactorDetail::Industry {
        overlap_count,
        company_count,
        ..
    }) = &subscores.industry.detail
    {
        bullets.push(format!("Industry: overlap {overlap_count}/{company_count}"));
    }

    if subscores.region.applied {
        bullets.push(if subscores.region.is_positive() {
            "Region: geographic fit".to_string()
        } else {
            "Region: no geographic overlap".to_string()
        });
    }

    bullets.extend(band_bullet("Revenue", &subscores.revenue));
    bullets.extend(band_bullet("Employees", &subscores.employees));

    if let Some(FactorDetail::Deal {
        company_deal_type,
        fund_deal_types,
    }) = &subscores.deal.detail
    {
        let note = deal_note(
            Some(company_deal_type.as_str()),
            fund_deal_types,
            subscores.deal.is_positive(),
            subscores.deal.weight,
            subscores.deal.contribution,
        );
        deal_misaligned = note.alignment != DealAlignment::Match;
        bullets.push(note.bullet);
    }

    if bullets.is_empty() {
        bullets.push("Generalist compatibility".to_string());
    }

    let conclusion = if deal_misaligned {
        format!(
            "Conclusion: Strong fit on non-deal factors, but deal-type misalignment; \
             consider only if the fund is flexible. Overall score {score:.2}."
        )
    } else {
        format!("Conclusion: Overall alignment is strong (including deal type). Overall score {score:.2}.")
    };

    FundSummary {
        bullets,
        conclusion,
    }
}

/// Short headline facts about the company, for the profile header.
pub fn profile_insights(profile: &CompanyProfile) -> Vec<String> {
    let mut insights = Vec::new();
    if !profile.industries.is_empty() {
        insights.push(format!("Sector focus: {}", profile.industries.join(", ")));
    }
    if !profile.locations.is_empty() {
        insights.push(format!("Geography: {}", profile.locations.join(", ")));
    }
    if let Some(range) = profile.revenue_range_usd.filter(|r| !r.is_unbounded()) {
        insights.push(format!("Revenue band: {}", format_money_range(Some(&range))));
    }
    if let Some(range) = profile.employee_count_range.filter(|r| !r.is_unbounded()) {
        insights.push(format!("Employee band: {}", format_count_range(Some(&range))));
    }
    if insights.is_empty() {
        insights.push("Limited explicit signals on the website; estimates applied.".to_string());
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{score_fund, Criteria};
    use crate::model::{Fund, ValueRange};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fund(deals: &[&str]) -> Fund {
        Fund {
            name: "Northwind Capital".to_string(),
            industries: strings(&["Software"]),
            regions: strings(&["US"]),
            revenue_focus_usd: ValueRange::between(10_000_000, 50_000_000),
            employee_focus: ValueRange::between(50, 500),
            deal_types: strings(deals),
        }
    }

    fn criteria() -> Criteria {
        Criteria {
            industries: strings(&["Software", "Healthcare"]),
            regions: strings(&["US"]),
            revenue_usd: Some(ValueRange::between(20_000_000, 60_000_000)),
            employees: None,
            deal_type: Some("Buyout".to_string()),
        }
    }

    #[test]
    fn test_industry_details() {
        let scored = score_fund(&criteria(), &fund(&["Buyout"]));
        assert_eq!(
            factor_details(Factor::Industry, &scored.subscores.industry),
            "Industry overlap 1/2. Company: healthcare, software. Fund: Software."
        );
    }

    #[test]
    fn test_region_details() {
        let scored = score_fund(&criteria(), &fund(&["Buyout"]));
        assert_eq!(
            factor_details(Factor::Region, &scored.subscores.region),
            "Regional alignment yes (overlap=1). Company regions: us. Fund regions: US."
        );
    }

    #[test]
    fn test_revenue_details_outside() {
        let scored = score_fund(&criteria(), &fund(&["Buyout"]));
        assert_eq!(
            factor_details(Factor::Revenue, &scored.subscores.revenue),
            "Company revenue $20.0M - $60.0M is outside the fund's target range (mostly covered (~75%))."
        );
    }

    #[test]
    fn test_skipped_factor_details() {
        let scored = score_fund(&criteria(), &fund(&["Buyout"]));
        assert_eq!(
            factor_details(Factor::Employees, &scored.subscores.employees),
            "No company employees signal; factor ignored (weight 0.1)."
        );

        let mut no_deal = criteria();
        no_deal.deal_type = None;
        let scored = score_fund(&no_deal, &fund(&["Buyout"]));
        assert!(factor_details(Factor::Deal, &scored.subscores.deal)
            .starts_with("No explicit deal type provided"));
    }

    #[test]
    fn test_summary_with_deal_match() {
        let scored = score_fund(&criteria(), &fund(&["Buyout"]));
        let summary = fund_summary(scored.score, &scored.subscores);
        assert_eq!(
            summary.bullets,
            strings(&[
                "Industry: overlap 1/2",
                "Region: geographic fit",
                "Revenue: outside focus (~75% covered)",
                "Deal type: MATCH, requested 'buyout' supported (fund: Buyout)",
            ])
        );
        assert_eq!(
            summary.conclusion,
            "Conclusion: Overall alignment is strong (including deal type). Overall score 0.50."
        );
    }

    #[test]
    fn test_summary_flags_deal_misalignment() {
        let scored = score_fund(&criteria(), &fund(&["Majority"]));
        let summary = fund_summary(scored.score, &scored.subscores);
        assert!(summary.bullets.last().unwrap().starts_with("Deal type: NEAR MATCH"));
        assert!(summary.conclusion.contains("deal-type misalignment"));
        assert!(summary.conclusion.ends_with("Overall score 0.40."));
    }

    #[test]
    fn test_summary_generalist_fallback() {
        let scored = score_fund(&Criteria::default(), &fund(&["Buyout"]));
        let summary = fund_summary(scored.score, &scored.subscores);
        assert_eq!(summary.bullets, strings(&["Generalist compatibility"]));
    }

    #[test]
    fn test_profile_insights() {
        let profile = CompanyProfile {
            industries: strings(&["Software"]),
            locations: strings(&["Austin, Texas"]),
            revenue_range_usd: Some(ValueRange::between(5_000_000, 80_000_000)),
            employee_count_range: Some(ValueRange::default()),
            ..Default::default()
        };
        assert_eq!(
            profile_insights(&profile),
            strings(&[
                "Sector focus: Software",
                "Geography: Austin, Texas",
                "Revenue band: $5.0M - $80.0M",
            ])
        );

        assert_eq!(
            profile_insights(&CompanyProfile::default()),
            strings(&["Limited explicit signals on the website; estimates applied."])
        );
    }
}
