//! Model evaluation for polynomial and piecewise-linear offset curves.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given temperature and term count (for least squares)
//! - predict the offset at `t` for a fitted model (for residuals/queries/plots)
//!
//! Neither applies clamping; range discipline belongs to `OffsetEngine`.

use crate::domain::FittedModel;
use crate::math::{fill_vandermonde_row, horner, interpolate};

/// Fill a polynomial design row with `out.len()` terms, highest power first.
pub fn fill_design_row(t: f64, out: &mut [f64]) {
    let terms = out.len();
    fill_vandermonde_row(t, terms, out);
}

/// Predict the raw (unclamped, unrounded) offset at temperature `t`.
pub fn predict(model: &FittedModel, t: f64) -> f64 {
    match model {
        FittedModel::Polynomial { coefficients, .. } => horner(coefficients, t),
        FittedModel::Linear { points } => interpolate(points, t).unwrap_or(0.0),
    }
}
