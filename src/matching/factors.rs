use serde::Serialize;
use std::collections::BTreeSet;

use super::range::coverage_ratio;
use super::weights::WEIGHTS;
use crate::model::{Fund, ValueRange};

/// The five scored dimensions, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Industry,
    Region,
    Revenue,
    Employees,
    Deal,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Industry,
        Factor::Region,
        Factor::Revenue,
        Factor::Employees,
        Factor::Deal,
    ];

    /// Key used in serialized breakdowns.
    pub fn key(&self) -> &'static str {
        match self {
            Factor::Industry => "industry",
            Factor::Region => "region",
            Factor::Revenue => "revenue",
            Factor::Employees => "employees",
            Factor::Deal => "deal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Industry => "Industry",
            Factor::Region => "Region",
            Factor::Revenue => "Revenue",
            Factor::Employees => "Employees",
            Factor::Deal => "Deal",
        }
    }
}

/// Factor-specific diagnostics kept alongside the numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FactorDetail {
    Industry {
        overlap_count: usize,
        company_count: usize,
        company_industries: Vec<String>,
        fund_industries: Vec<String>,
    },
    Region {
        overlap_count: usize,
        company_regions: Vec<String>,
        fund_regions: Vec<String>,
    },
    Range {
        binary_fit: f64,
        coverage_ratio: Option<f64>,
        company_range: ValueRange,
        fund_range: ValueRange,
    },
    Deal {
        company_deal_type: String,
        fund_deal_types: Vec<String>,
    },
}

/// One factor's result for one fund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscore {
    /// False when the criterion was absent; such a factor contributes nothing.
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
    pub weight: f64,
    /// `weight * raw`, rounded to 4 decimals. Zero when not applied.
    pub contribution: f64,
    #[serde(flatten)]
    pub detail: Option<FactorDetail>,
}

impl Subscore {
    fn skipped(weight: f64) -> Self {
        Self {
            applied: false,
            raw: None,
            weight,
            contribution: 0.0,
            detail: None,
        }
    }

    fn scored(weight: f64, raw: f64, detail: FactorDetail) -> Self {
        Self {
            applied: true,
            raw: Some(raw),
            weight,
            contribution: round4(weight * raw),
            detail: Some(detail),
        }
    }

    /// Unrounded `weight * raw` used to build the composite score.
    pub fn weighted(&self) -> f64 {
        if self.applied {
            self.raw.unwrap_or(0.0) * self.weight
        } else {
            0.0
        }
    }

    /// Applied and scored above zero.
    pub fn is_positive(&self) -> bool {
        self.applied && self.raw.is_some_and(|r| r > 0.0)
    }
}

/// All five subscores for a fund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscores {
    pub industry: Subscore,
    pub region: Subscore,
    pub revenue: Subscore,
    pub employees: Subscore,
    pub deal: Subscore,
}

impl Subscores {
    pub fn get(&self, factor: Factor) -> &Subscore {
        match factor {
            Factor::Industry => &self.industry,
            Factor::Region => &self.region,
            Factor::Revenue => &self.revenue,
            Factor::Employees => &self.employees,
            Factor::Deal => &self.deal,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, &Subscore)> {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Sum of unrounded weighted values.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, s)| s.weighted()).sum()
    }
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Trimmed, lowercased, deduplicated. Sorted so breakdowns are reproducible.
fn folded(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Share of the company's industries the fund covers. Partial overlap earns partial credit.
pub fn score_industry(industries: &[String], fund: &Fund) -> Subscore {
    let weight = WEIGHTS.industry;
    let wanted = folded(industries);
    if wanted.is_empty() {
        return Subscore::skipped(weight);
    }

    let offered = folded(&fund.industries);
    let overlap = wanted.intersection(&offered).count();
    let raw = (overlap as f64 / wanted.len().max(1) as f64).min(1.0);

    Subscore::scored(
        weight,
        raw,
        FactorDetail::Industry {
            overlap_count: overlap,
            company_count: wanted.len(),
            company_industries: wanted.into_iter().collect(),
            fund_industries: fund.industries.clone(),
        },
    )
}

/// Any shared region earns full credit.
pub fn score_region(regions: &[String], fund: &Fund) -> Subscore {
    let weight = WEIGHTS.region;
    let wanted = folded(regions);
    if wanted.is_empty() {
        return Subscore::skipped(weight);
    }

    let covered = folded(&fund.regions);
    let overlap = wanted.intersection(&covered).count();
    let raw = if overlap > 0 { 1.0 } else { 0.0 };

    Subscore::scored(
        weight,
        raw,
        FactorDetail::Region {
            overlap_count: overlap,
            company_regions: wanted.into_iter().collect(),
            fund_regions: fund.regions.clone(),
        },
    )
}

pub fn score_revenue(company: Option<&ValueRange>, fund: &Fund) -> Subscore {
    score_band(WEIGHTS.revenue, company, &fund.revenue_focus_usd)
}

pub fn score_employees(company: Option<&ValueRange>, fund: &Fund) -> Subscore {
    score_band(WEIGHTS.employees, company, &fund.employee_focus)
}

/// Binary containment of the company's band inside the fund's focus band.
fn score_band(weight: f64, company: Option<&ValueRange>, focus: &ValueRange) -> Subscore {
    let Some(company) = company.filter(|r| !r.is_unbounded()) else {
        return Subscore::skipped(weight);
    };

    let binary_fit = if company.within(focus) { 1.0 } else { 0.0 };
    Subscore::scored(
        weight,
        binary_fit,
        FactorDetail::Range {
            binary_fit,
            coverage_ratio: coverage_ratio(company, focus),
            company_range: *company,
            fund_range: *focus,
        },
    )
}

/// Exact, case-insensitive deal-type membership. Adjacent deal types earn nothing here.
pub fn score_deal(deal_type: Option<&str>, fund: &Fund) -> Subscore {
    let weight = WEIGHTS.deal;
    let Some(wanted) = deal_type.map(|d| d.trim().to_lowercase()).filter(|d| !d.is_empty()) else {
        return Subscore::skipped(weight);
    };

    let supported = fund
        .deal_types
        .iter()
        .any(|d| d.trim().to_lowercase() == wanted);
    let raw = if supported { 1.0 } else { 0.0 };

    Subscore::scored(
        weight,
        raw,
        FactorDetail::Deal {
            company_deal_type: wanted,
            fund_deal_types: fund.deal_types.clone(),
        },
    )
}
