use serde::Serialize;

use super::factors::Factor;

/// Fixed factor weights. Industry dominates; region and size bands matter equally;
/// headcount and deal type are tie-breakers.
pub const WEIGHTS: Weights = Weights {
    industry: 0.4,
    region: 0.2,
    revenue: 0.2,
    employees: 0.1,
    deal: 0.1,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub industry: f64,
    pub region: f64,
    pub revenue: f64,
    pub employees: f64,
    pub deal: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.industry + self.region + self.revenue + self.employees + self.deal
    }

    pub fn of(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Industry => self.industry,
            Factor::Region => self.region,
            Factor::Revenue => self.revenue,
            Factor::Employees => self.employees,
            Factor::Deal => self.deal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weights_lookup_by_factor() {
        let total: f64 = Factor::ALL.iter().map(|f| WEIGHTS.of(*f)).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(WEIGHTS.of(Factor::Industry), 0.4);
        assert_eq!(WEIGHTS.of(Factor::Deal), 0.1);
    }
}
