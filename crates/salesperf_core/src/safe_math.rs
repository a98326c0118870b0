//! Null-safe arithmetic shared by every analyzer
//!
//! All division in the engine goes through [`safe_div`] or [`ratio_pct`]. A
//! zero, negative or non-finite denominator yields `None`, so no share, rate or
//! variance can come out as `NaN` or infinity.

/// Value at `index`, or 0 when the index is absent, past the end, or the
/// stored value is not finite.
#[inline]
pub fn value_at(values: &[f64], index: Option<usize>) -> f64 {
    index
        .and_then(|i| values.get(i))
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Sum of `value_at(index)` across rows. No index means 0.
pub fn sum_at<'a>(index: Option<usize>, rows: impl IntoIterator<Item = &'a [f64]>) -> f64 {
    if index.is_none() {
        return 0.0;
    }
    rows.into_iter().map(|values| value_at(values, index)).sum()
}

/// `a / b`, defined only for finite inputs and a strictly positive denominator
#[inline]
pub fn safe_div(a: f64, b: f64) -> Option<f64> {
    if a.is_finite() && b.is_finite() && b > 0.0 {
        Some(a / b).filter(|r| r.is_finite())
    } else {
        None
    }
}

/// Percentage variance of `a` against `b`: `((a - b) / b) * 100`
#[inline]
pub fn ratio_pct(a: f64, b: f64) -> Option<f64> {
    if !a.is_finite() {
        return None;
    }
    safe_div(a - b, b)
        .map(|r| r * 100.0)
        .filter(|pct| pct.is_finite())
}

/// Fraction of `total` held by `part`; 0 unless both are positive
#[inline]
pub fn share(part: f64, total: f64) -> f64 {
    if part <= 0.0 {
        return 0.0;
    }
    safe_div(part, total).unwrap_or(0.0)
}
