use crate::model::ValueRange;

/// Stand-in length for a zero-width company range.
const EMPTY_SPAN: f64 = 1e-9;

/// Fraction of the company's range that falls inside the fund's range, in [0, 1].
///
/// Returns `None` when any of the four bounds is unknown; that is "not computable",
/// not zero. An inverted range on either side covers nothing. A single-point company
/// range is fully covered when the point lies inside the fund range.
///
/// Diagnostic only: the revenue and headcount scores use [`ValueRange::within`].
pub fn coverage_ratio(company: &ValueRange, fund: &ValueRange) -> Option<f64> {
    let (Some(cmin), Some(cmax), Some(fmin), Some(fmax)) =
        (company.min, company.max, fund.min, fund.max)
    else {
        return None;
    };

    if cmax < cmin || fmax < fmin {
        return Some(0.0);
    }

    if cmin == cmax {
        let inside = fmin <= cmin && cmin <= fmax;
        return Some(if inside { 1.0 } else { 0.0 });
    }

    let (cmin, cmax, fmin, fmax) = (cmin as f64, cmax as f64, fmin as f64, fmax as f64);
    let overlap = (cmax.min(fmax) - cmin.max(fmin)).max(0.0);
    let span = (cmax - cmin).max(EMPTY_SPAN);
    Some((overlap / span).clamp(0.0, 1.0))
}
