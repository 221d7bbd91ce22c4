//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and querying
//! - exported to JSON/CSV
//! - reloaded later for plotting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, Result};

/// Default minimum number of calibration points for a usable data set.
pub const DEFAULT_MIN_CALIBRATION_POINTS: usize = 3;
/// Default goodness-of-fit bar a polynomial must reach to be selected.
pub const DEFAULT_MIN_R_SQUARED: f64 = 0.998;
/// Default fewest polynomial coefficients tried (2 = straight line).
pub const DEFAULT_MIN_POLY_TERMS: usize = 2;
/// Default most polynomial coefficients tried (capped at `n - 1`).
pub const DEFAULT_MAX_POLY_TERMS: usize = 5;
/// Default residual scale of the coldest calibration point relative to the rest.
pub const DEFAULT_ANCHOR_WEIGHT: f64 = 100.0;

/// Calibration used when no data is supplied.
pub const DEFAULT_CALIBRATION_BLOB: &str = concat!(
    "    30, 0.000\n",
    "    40, -0.015\n",
    "    50, -0.033\n",
    "    60, -0.056\n",
    "    70, -0.081\n",
    "    80, -0.111\n",
);

/// One observed `(temperature, offset)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub temperature: f64,
    pub offset: f64,
}

impl CalibrationPoint {
    pub fn new(temperature: f64, offset: f64) -> Self {
        Self {
            temperature,
            offset,
        }
    }
}

impl From<(f64, f64)> for CalibrationPoint {
    fn from((temperature, offset): (f64, f64)) -> Self {
        Self::new(temperature, offset)
    }
}

/// Tunable knobs for validation and model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// A data set is valid with at least this many distinct points.
    pub min_calibration_points: usize,
    /// Minimum coefficient of determination for a polynomial to be accepted.
    pub min_r_squared: f64,
    pub min_poly_terms: usize,
    pub max_poly_terms: usize,
    /// Residual scale applied to the coldest point (all others use 1).
    ///
    /// `100` is equivalent to giving that point a least-squares sigma of
    /// `0.01` against `1.0` for the rest.
    pub anchor_weight: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_calibration_points: DEFAULT_MIN_CALIBRATION_POINTS,
            min_r_squared: DEFAULT_MIN_R_SQUARED,
            min_poly_terms: DEFAULT_MIN_POLY_TERMS,
            max_poly_terms: DEFAULT_MAX_POLY_TERMS,
            anchor_weight: DEFAULT_ANCHOR_WEIGHT,
        }
    }
}

impl FitConfig {
    /// Reject settings the selector cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.min_calibration_points < 2 {
            return Err(CalibrationError::InvalidConfig(format!(
                "min_calibration_points must be >= 2 (got {}).",
                self.min_calibration_points
            )));
        }
        if self.min_poly_terms < 1 {
            return Err(CalibrationError::InvalidConfig(
                "min_poly_terms must be >= 1.".to_string(),
            ));
        }
        if self.max_poly_terms < self.min_poly_terms {
            return Err(CalibrationError::InvalidConfig(format!(
                "max_poly_terms ({}) must be >= min_poly_terms ({}).",
                self.max_poly_terms, self.min_poly_terms
            )));
        }
        if !(self.min_r_squared.is_finite() && self.min_r_squared <= 1.0) {
            return Err(CalibrationError::InvalidConfig(format!(
                "min_r_squared must be finite and <= 1 (got {}).",
                self.min_r_squared
            )));
        }
        if !(self.anchor_weight.is_finite() && self.anchor_weight > 0.0) {
            return Err(CalibrationError::InvalidConfig(format!(
                "anchor_weight must be finite and > 0 (got {}).",
                self.anchor_weight
            )));
        }
        Ok(())
    }
}

/// The model selected for a calibration data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FittedModel {
    /// Coefficients are ordered highest degree first:
    /// `c[0] * t^degree + ... + c[degree]`.
    Polynomial { degree: usize, coefficients: Vec<f64> },
    /// Piecewise-linear interpolation through the sorted calibration points.
    Linear { points: Vec<CalibrationPoint> },
}

impl FittedModel {
    pub fn display_name(&self) -> String {
        match self {
            FittedModel::Polynomial { degree, .. } => format!("polynomial (degree {degree})"),
            FittedModel::Linear { .. } => "piecewise linear".to_string(),
        }
    }

    pub fn is_polynomial(&self) -> bool {
        matches!(self, FittedModel::Polynomial { .. })
    }
}

/// Goodness of fit of a polynomial against the calibration points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub r_squared: f64,
    pub ss_res: f64,
    pub ss_tot: f64,
    pub max_abs_residual: f64,
}

/// Fitted value and residual at one calibration point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointResidual {
    pub point: CalibrationPoint,
    pub fitted: f64,
    pub residual: f64,
}

/// Sampled curve stored in the curve JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub temperature: Vec<f64>,
    pub offset: Vec<f64>,
}

/// Portable representation of a calibrated curve (diagnostic export).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub config: FitConfig,
    pub model: FittedModel,
    pub fit_quality: Option<FitQuality>,
    pub temperature_range: (f64, f64),
    pub offset_range: (f64, f64),
    pub calibration: Vec<CalibrationPoint>,
    pub grid: CurveGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_self_consistent() {
        let config = FitConfig::default();
        assert!(config.min_calibration_points >= 3);
        assert!((0.0..=1.0).contains(&config.min_r_squared));
        assert!(config.min_poly_terms >= 2);
        assert!(config.max_poly_terms >= config.min_poly_terms);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_inverted_term_range() {
        let config = FitConfig {
            min_poly_terms: 4,
            max_poly_terms: 3,
            ..FitConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CalibrationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_r_squared_and_anchor() {
        let config = FitConfig {
            min_r_squared: f64::NAN,
            ..FitConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FitConfig {
            anchor_weight: 0.0,
            ..FitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserializes_with_partial_fields() {
        let config: FitConfig = serde_json::from_str(r#"{"min_r_squared": 0.99}"#).unwrap();
        assert_eq!(config.min_r_squared, 0.99);
        assert_eq!(config.max_poly_terms, DEFAULT_MAX_POLY_TERMS);
    }

    #[test]
    fn fitted_model_serializes_with_kind_tag() {
        let model = FittedModel::Polynomial {
            degree: 1,
            coefficients: vec![2.0, 1.0],
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["kind"], "polynomial");
        assert_eq!(json["degree"], 1);
    }
}
