use serde::{Deserialize, Serialize};

/// Inclusive numeric range where either bound may be unknown.
///
/// Used for company revenue/headcount estimates and for fund focus bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default, deserialize_with = "super::lenient::integer")]
    pub min: Option<i64>,
    #[serde(default, deserialize_with = "super::lenient::integer")]
    pub max: Option<i64>,
}

impl ValueRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn between(min: i64, max: i64) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn point(value: i64) -> Self {
        Self::between(value, value)
    }

    /// True when neither bound is known.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// `Some(self)` when at least one bound is known.
    pub fn specified(self) -> Option<Self> {
        if self.is_unbounded() {
            None
        } else {
            Some(self)
        }
    }

    /// True when `self` sits inside `outer`. A bound missing on either side places no
    /// constraint on that side.
    pub fn within(&self, outer: &ValueRange) -> bool {
        let lower_ok = match (self.min, outer.min) {
            (Some(inner), Some(outer)) => inner >= outer,
            _ => true,
        };
        let upper_ok = match (self.max, outer.max) {
            (Some(inner), Some(outer)) => inner <= outer,
            _ => true,
        };
        lower_ok && upper_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_both_bounds() {
        let fund = ValueRange::between(10, 50);
        assert!(ValueRange::between(20, 40).within(&fund));
        assert!(ValueRange::between(10, 50).within(&fund));
        assert!(!ValueRange::between(5, 40).within(&fund));
        assert!(!ValueRange::between(20, 60).within(&fund));
    }

    #[test]
    fn test_missing_bounds_do_not_constrain() {
        let fund = ValueRange::new(Some(10), None);
        assert!(ValueRange::between(20, 1_000_000).within(&fund));
        assert!(!ValueRange::between(5, 20).within(&fund));

        let company = ValueRange::new(None, Some(40));
        assert!(company.within(&ValueRange::between(10, 50)));
        assert!(ValueRange::between(1, 2).within(&ValueRange::default()));
    }

    #[test]
    fn test_specified() {
        assert!(ValueRange::default().specified().is_none());
        assert_eq!(
            ValueRange::new(None, Some(5)).specified(),
            Some(ValueRange::new(None, Some(5)))
        );
    }
}
