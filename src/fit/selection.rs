//! Model selection: simplest polynomial that explains the calibration data.
//!
//! The selector tries polynomials of increasing order and keeps the first
//! one whose R² reaches `min_r_squared`:
//!
//! 1. `max_terms = min(max_poly_terms, n - 1)`; if that is below
//!    `min_poly_terms`, go straight to the linear fallback
//! 2. for `terms` in `min_poly_terms..=max_terms`, fit and score
//! 3. stop at the first acceptable fit (no search for a better one)
//! 4. if none qualifies, interpolate linearly between calibration points
//!
//! A failed solve for one order is recorded and skipped.

use serde::Serialize;

use crate::data::CalibrationDataSet;
use crate::domain::{FitConfig, FitQuality, FittedModel};
use crate::error::{CalibrationError, Result};
use crate::fit::fitter::{anchor_scales, fit_polynomial};

/// Result of trying one polynomial order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum AttemptOutcome {
    Scored { r_squared: f64 },
    Unsolvable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitAttempt {
    pub terms: usize,
    pub outcome: AttemptOutcome,
}

impl FitAttempt {
    pub fn degree(&self) -> usize {
        self.terms.saturating_sub(1)
    }
}

/// Why the linear fallback was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Too few points for even the smallest polynomial (`n - 1 < min_poly_terms`).
    TooFewPoints,
    /// Every order was tried and none reached `min_r_squared`.
    BelowThreshold,
}

/// Output of fitting + selection.
#[derive(Debug, Clone)]
pub struct FitSelection {
    pub model: FittedModel,
    /// Quality of the chosen polynomial; `None` for the linear fallback.
    pub quality: Option<FitQuality>,
    /// Every order tried, in order.
    pub attempts: Vec<FitAttempt>,
    pub fallback: Option<FallbackReason>,
}

/// Chooses a `FittedModel` for a validated data set.
#[derive(Debug, Clone, Default)]
pub struct CurveFitSelector {
    config: FitConfig,
}

impl CurveFitSelector {
    pub fn new(config: FitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Fit and select a model for `dataset`.
    ///
    /// Fails only with `DatasetInvalid`, before any numeric work.
    pub fn select(&self, dataset: &CalibrationDataSet) -> Result<FitSelection> {
        if !dataset.is_valid() {
            return Err(CalibrationError::DatasetInvalid);
        }

        let temperatures = dataset.temperatures();
        let offsets = dataset.offsets();
        let n = temperatures.len();
        let scales = anchor_scales(n, self.config.anchor_weight);

        let min_terms = self.config.min_poly_terms;
        let max_terms = self.config.max_poly_terms.min(n.saturating_sub(1));

        if max_terms < min_terms {
            tracing::warn!(
                points = n,
                min_terms,
                "too few calibration points for a polynomial; using linear interpolation"
            );
            return Ok(linear_fallback(dataset, Vec::new(), FallbackReason::TooFewPoints));
        }

        let mut attempts = Vec::with_capacity(max_terms - min_terms + 1);
        for terms in min_terms..=max_terms {
            let Some(fit) = fit_polynomial(&temperatures, &offsets, &scales, terms) else {
                tracing::debug!(terms, "polynomial solve failed; trying next order");
                attempts.push(FitAttempt {
                    terms,
                    outcome: AttemptOutcome::Unsolvable,
                });
                continue;
            };

            let r_squared = fit.quality.r_squared;
            tracing::debug!(terms, r_squared, "scored polynomial candidate");
            attempts.push(FitAttempt {
                terms,
                outcome: AttemptOutcome::Scored { r_squared },
            });

            if r_squared >= self.config.min_r_squared {
                tracing::info!(
                    degree = terms - 1,
                    r_squared,
                    max_abs_residual = fit.quality.max_abs_residual,
                    "selected polynomial offset model"
                );
                return Ok(FitSelection {
                    model: fit.model,
                    quality: Some(fit.quality),
                    attempts,
                    fallback: None,
                });
            }
        }

        tracing::warn!(
            min_r_squared = self.config.min_r_squared,
            "no polynomial reached the R² threshold; using linear interpolation"
        );
        Ok(linear_fallback(dataset, attempts, FallbackReason::BelowThreshold))
    }
}

/// Fit and select with the default configuration.
pub fn fit_and_select(dataset: &CalibrationDataSet) -> Result<FitSelection> {
    CurveFitSelector::default().select(dataset)
}

fn linear_fallback(
    dataset: &CalibrationDataSet,
    attempts: Vec<FitAttempt>,
    reason: FallbackReason,
) -> FitSelection {
    FitSelection {
        model: FittedModel::Linear {
            points: dataset.points().to_vec(),
        },
        quality: None,
        attempts,
        fallback: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_CALIBRATION_BLOB;
    use crate::models::predict;

    fn dataset(pairs: &[(f64, f64)]) -> CalibrationDataSet {
        CalibrationDataSet::from_pairs(pairs, &FitConfig::default()).unwrap()
    }

    #[test]
    fn invalid_dataset_is_rejected_up_front() {
        let err = fit_and_select(&CalibrationDataSet::empty()).unwrap_err();
        assert_eq!(err, CalibrationError::DatasetInvalid);
    }

    #[test]
    fn default_blob_selects_quadratic() {
        let ds: CalibrationDataSet = DEFAULT_CALIBRATION_BLOB.parse().unwrap();
        let sel = fit_and_select(&ds).unwrap();

        // A straight line is tried first and rejected; the quadratic is kept.
        assert_eq!(sel.attempts.len(), 2);
        assert!(matches!(
            sel.attempts[0].outcome,
            AttemptOutcome::Scored { r_squared } if r_squared < 0.998
        ));
        assert!(matches!(sel.model, FittedModel::Polynomial { degree: 2, .. }));
        assert!(sel.fallback.is_none());
        assert!(sel.quality.unwrap().r_squared >= 0.998);

        for p in ds.points() {
            assert!((predict(&sel.model, p.temperature) - p.offset).abs() <= 0.01);
        }
    }

    #[test]
    fn stops_at_first_acceptable_order() {
        // Exact line: the 2-term fit is perfect, higher orders are never tried.
        let ds = dataset(&[(0.0, 5.0), (10.0, 15.0), (20.0, 25.0), (30.0, 35.0), (40.0, 45.0)]);
        let sel = fit_and_select(&ds).unwrap();
        assert_eq!(sel.attempts.len(), 1);
        assert!(matches!(sel.model, FittedModel::Polynomial { degree: 1, .. }));
    }

    #[test]
    fn zigzag_falls_back_to_linear() {
        let ds = dataset(&[(0.0, 0.0), (10.0, 1.0), (20.0, 0.0), (30.0, 1.0), (40.0, 0.0)]);
        let sel = fit_and_select(&ds).unwrap();
        assert_eq!(sel.fallback, Some(FallbackReason::BelowThreshold));
        assert_eq!(sel.attempts.len(), 3); // terms 2, 3, 4 (capped at n - 1)
        assert!(sel.quality.is_none());
        for p in ds.points() {
            assert_eq!(predict(&sel.model, p.temperature), p.offset);
        }
    }

    #[test]
    fn term_cap_below_minimum_skips_fitting() {
        let config = FitConfig {
            min_calibration_points: 3,
            min_poly_terms: 3,
            max_poly_terms: 5,
            ..FitConfig::default()
        };
        let ds = CalibrationDataSet::from_pairs(&[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)], &config)
            .unwrap();
        let sel = CurveFitSelector::new(config).unwrap().select(&ds).unwrap();
        assert_eq!(sel.fallback, Some(FallbackReason::TooFewPoints));
        assert!(sel.attempts.is_empty());
    }

    #[test]
    fn three_points_fit_a_line() {
        let ds = dataset(&[(0.0, 5.0), (10.0, 15.0), (20.0, 25.0)]);
        let sel = fit_and_select(&ds).unwrap();
        assert!(matches!(sel.model, FittedModel::Polynomial { degree: 1, .. }));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FitConfig {
            min_poly_terms: 0,
            ..FitConfig::default()
        };
        assert!(matches!(
            CurveFitSelector::new(config),
            Err(CalibrationError::InvalidConfig(_))
        ));
    }
}
