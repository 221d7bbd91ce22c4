//! Low-level fitting routines for a single polynomial order.
//!
//! Given:
//! - temperatures `t_i`
//! - observed offsets `y_i`
//! - residual scales `s_i`
//! - a term count `k` (degree `k - 1`)
//!
//! we solve a row-scaled least squares problem for the `k` coefficients and
//! score the result with the (unweighted) coefficient of determination.

use crate::domain::{FitQuality, FittedModel};
use crate::math::solve_scaled_least_squares;
use crate::models::{fill_design_row, predict};

/// `SS_tot` below this is treated as "all offsets identical".
const SS_TOT_EPS: f64 = 1e-24;

/// A solved polynomial of one order.
#[derive(Debug, Clone)]
pub struct PolyFit {
    pub terms: usize,
    pub model: FittedModel,
    pub quality: FitQuality,
}

/// Residual scale per point: the first (coldest) point gets `anchor`, the
/// rest get 1.
pub fn anchor_scales(n: usize, anchor: f64) -> Vec<f64> {
    let mut scales = vec![1.0; n];
    if let Some(first) = scales.first_mut() {
        *first = anchor;
    }
    scales
}

/// Fit a polynomial with `terms` coefficients.
///
/// Returns `None` when the problem is underdetermined (`terms > n`) or the
/// solve does not produce finite coefficients and residuals. Callers treat
/// that as "this order failed", not as an error.
pub fn fit_polynomial(
    temperatures: &[f64],
    offsets: &[f64],
    scales: &[f64],
    terms: usize,
) -> Option<PolyFit> {
    let n = temperatures.len();
    if terms == 0 || terms > n || offsets.len() != n || scales.len() != n {
        return None;
    }

    let mut design = vec![0.0; n * terms];
    for (i, &t) in temperatures.iter().enumerate() {
        fill_design_row(t, &mut design[i * terms..(i + 1) * terms]);
    }

    let coefficients = solve_scaled_least_squares(&design, terms, offsets, scales)?;
    let model = FittedModel::Polynomial {
        degree: terms - 1,
        coefficients,
    };
    let quality = score(&model, temperatures, offsets)?;

    Some(PolyFit {
        terms,
        model,
        quality,
    })
}

/// Goodness of fit: `R² = 1 - SS_res / SS_tot` on unweighted residuals.
///
/// When every offset is identical (`SS_tot == 0`) R² is 1 for an exact fit
/// and 0 otherwise. Returns `None` if any prediction is non-finite.
pub fn score(model: &FittedModel, temperatures: &[f64], offsets: &[f64]) -> Option<FitQuality> {
    let n = offsets.len();
    if n == 0 || temperatures.len() != n {
        return None;
    }
    let mean = offsets.iter().sum::<f64>() / n as f64;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut max_abs_residual: f64 = 0.0;
    for (&t, &y) in temperatures.iter().zip(offsets.iter()) {
        let r = y - predict(model, t);
        if !r.is_finite() {
            return None;
        }
        ss_res += r * r;
        ss_tot += (y - mean) * (y - mean);
        max_abs_residual = max_abs_residual.max(r.abs());
    }

    let r_squared = if ss_tot <= SS_TOT_EPS {
        if ss_res <= SS_TOT_EPS { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(FitQuality {
        r_squared,
        ss_res,
        ss_tot,
        max_abs_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_scales_only_touch_first_point() {
        assert_eq!(anchor_scales(3, 100.0), vec![100.0, 1.0, 1.0]);
        assert!(anchor_scales(0, 100.0).is_empty());
    }

    #[test]
    fn exact_line_scores_one() {
        let t = [0.0, 10.0, 20.0];
        let y = [5.0, 15.0, 25.0];
        let fit = fit_polynomial(&t, &y, &anchor_scales(3, 100.0), 2).unwrap();
        assert!((fit.quality.r_squared - 1.0).abs() < 1e-12);
        let FittedModel::Polynomial { degree, coefficients } = &fit.model else {
            panic!("expected a polynomial");
        };
        assert_eq!(*degree, 1);
        assert!((coefficients[0] - 1.0).abs() < 1e-9);
        assert!((coefficients[1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn quadratic_recovers_curvature() {
        let t: Vec<f64> = (0..6).map(|i| 30.0 + 10.0 * i as f64).collect();
        let y: Vec<f64> = t.iter().map(|&x| -1e-5 * x * x + 2e-4 * x + 0.01).collect();
        let fit = fit_polynomial(&t, &y, &anchor_scales(6, 100.0), 3).unwrap();
        assert!(fit.quality.r_squared > 1.0 - 1e-9);
        assert!(fit.quality.max_abs_residual < 1e-9);
    }

    #[test]
    fn anchor_pulls_fit_through_first_point() {
        // A straight line cannot pass through all three points; the anchored
        // first point must be matched much more closely than the others.
        let t = [0.0, 10.0, 20.0];
        let y = [0.0, 1.0, 0.0];
        let fit = fit_polynomial(&t, &y, &anchor_scales(3, 100.0), 2).unwrap();
        let r0 = (predict(&fit.model, 0.0) - 0.0).abs();
        let r1 = (predict(&fit.model, 10.0) - 1.0).abs();
        assert!(r0 < 1e-3, "anchor residual {r0}");
        assert!(r1 > 0.1);
    }

    #[test]
    fn underdetermined_order_is_refused() {
        let t = [0.0, 1.0];
        let y = [0.0, 1.0];
        assert!(fit_polynomial(&t, &y, &[1.0, 1.0], 3).is_none());
        assert!(fit_polynomial(&t, &y, &[1.0, 1.0], 0).is_none());
    }

    #[test]
    fn constant_offsets_score_by_exactness() {
        let t = [0.0, 1.0, 2.0];
        let y = [0.5, 0.5, 0.5];
        let flat = FittedModel::Polynomial {
            degree: 0,
            coefficients: vec![0.5],
        };
        assert_eq!(score(&flat, &t, &y).unwrap().r_squared, 1.0);

        let off = FittedModel::Polynomial {
            degree: 0,
            coefficients: vec![0.6],
        };
        assert_eq!(score(&off, &t, &y).unwrap().r_squared, 0.0);
    }
}
