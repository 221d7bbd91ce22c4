//! Weighted least squares solver.
//!
//! Each polynomial candidate is a small linear regression problem:
//!
//! ```text
//! minimize Σ (s_i (y_i - x_i^T c))^2
//! ```
//!
//! where `s_i` is the per-point residual scale (the coldest calibration point
//! gets a large scale, every other point gets 1).
//!
//! Implementation choices:
//! - Rows are scaled by `s_i` and the result is solved as ordinary least squares.
//! - SVD handles tall (more rows than columns) and badly conditioned
//!   Vandermonde systems. Nalgebra's `QR::solve` is only meant for square
//!   systems and panics otherwise.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Singular values below `tol` are treated as zero. Start strict and relax.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve `min Σ (s_i (y_i - x_i^T c))^2` for a row-major design.
///
/// `design` holds `scales.len()` rows of `cols` values each.
pub fn solve_scaled_least_squares(
    design: &[f64],
    cols: usize,
    y: &[f64],
    scales: &[f64],
) -> Option<Vec<f64>> {
    let rows = y.len();
    if cols == 0 || rows < cols || design.len() != rows * cols || scales.len() != rows {
        return None;
    }

    let mut xw = DMatrix::<f64>::zeros(rows, cols);
    let mut yw = DVector::<f64>::zeros(rows);
    for i in 0..rows {
        let s = scales[i];
        for j in 0..cols {
            xw[(i, j)] = design[i * cols + j] * s;
        }
        yw[i] = y[i] * s;
    }

    solve_least_squares(&xw, &yw).map(|beta| beta.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn large_scale_pins_the_scaled_row() {
        // Fit a constant to [0, 1, 1]; heavily scaling the first row pulls the
        // estimate towards 0.
        let design = [1.0, 1.0, 1.0];
        let y = [0.0, 1.0, 1.0];

        let even = solve_scaled_least_squares(&design, 1, &y, &[1.0, 1.0, 1.0]).unwrap();
        assert!((even[0] - 2.0 / 3.0).abs() < 1e-12);

        let pinned = solve_scaled_least_squares(&design, 1, &y, &[100.0, 1.0, 1.0]).unwrap();
        assert!(pinned[0].abs() < 1e-3, "got {}", pinned[0]);
    }

    #[test]
    fn underdetermined_shapes_are_refused() {
        let design = [1.0, 0.0, 1.0, 1.0];
        assert!(solve_scaled_least_squares(&design, 2, &[1.0], &[1.0]).is_none());
        assert!(solve_scaled_least_squares(&design, 2, &[1.0, 2.0], &[1.0]).is_none());
    }
}
