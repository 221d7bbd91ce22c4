//! Polynomial and piecewise-linear primitives.
//!
//! Coefficient convention: highest degree first, as in
//! `c[0] * t^d + c[1] * t^(d-1) + ... + c[d]`. The design rows built for
//! fitting use the same column order, so fitted coefficients can be passed
//! straight to `horner`.

use crate::domain::CalibrationPoint;

/// Evaluate a polynomial (highest degree first) in Horner form.
///
/// An empty coefficient list evaluates to `0.0`.
pub fn horner(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * t + c)
}

/// Fill one design row `[t^(terms-1), ..., t, 1]`.
///
/// # Panics
/// Panics if `out.len() != terms`.
pub fn fill_vandermonde_row(t: f64, terms: usize, out: &mut [f64]) {
    assert_eq!(out.len(), terms, "design row length must equal term count");
    let mut power = 1.0;
    for slot in out.iter_mut().rev() {
        *slot = power;
        power *= t;
    }
}

/// Linear interpolation through points sorted ascending by temperature.
///
/// Outside the calibrated range the nearest endpoint value is returned
/// (flat extension); NaN gets the lowest point's value. Returns `None` for an
/// empty slice.
pub fn interpolate(points: &[CalibrationPoint], t: f64) -> Option<f64> {
    let first = points.first()?;
    let last = points.last()?;
    if t.is_nan() || t <= first.temperature {
        return Some(first.offset);
    }
    if t >= last.temperature {
        return Some(last.offset);
    }

    // First point strictly above `t`; the range checks above keep idx in 1..len.
    let idx = points.partition_point(|p| p.temperature <= t);
    let lo = points[idx - 1];
    let hi = points[idx];
    if t == lo.temperature {
        return Some(lo.offset);
    }
    let u = (t - lo.temperature) / (hi.temperature - lo.temperature);
    Some(lo.offset + u * (hi.offset - lo.offset))
}
