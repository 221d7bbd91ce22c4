//! Clamped, rounded offset queries.
//!
//! An `OffsetEngine` is built once from a valid `CalibrationDataSet` and is
//! read-only afterwards, so it can be shared between threads freely.
//!
//! Query rules:
//! - the temperature is clamped into the calibrated range first; a fitted
//!   polynomial is never evaluated outside it
//! - the selected model is evaluated at the clamped temperature
//! - the result is rounded to 3 decimal places

use rayon::prelude::*;

use crate::data::CalibrationDataSet;
use crate::domain::{FitConfig, FittedModel, PointResidual};
use crate::error::{CalibrationError, Result};
use crate::fit::{CurveFitSelector, FitSelection};
use crate::models::predict;

/// Something that can remove thermal drift from a raw measurement.
///
/// Hosts hold an implementation and call it between taking a measurement
/// and reporting it.
pub trait OffsetCorrection {
    /// Drift-induced offset at `temperature`.
    fn offset(&self, temperature: f64) -> f64;

    /// `raw_measurement` with the drift at `temperature` removed.
    fn correct(&self, raw_measurement: f64, temperature: f64) -> f64 {
        raw_measurement - self.offset(temperature)
    }
}

#[derive(Debug, Clone)]
pub struct OffsetEngine {
    dataset: CalibrationDataSet,
    selection: FitSelection,
    temperature_range: (f64, f64),
    offset_range: (f64, f64),
}

impl OffsetEngine {
    /// Build an engine with the default configuration.
    pub fn from_dataset(dataset: CalibrationDataSet) -> Result<Self> {
        Self::new(dataset, &FitConfig::default())
    }

    /// Build an engine, fitting the model once.
    ///
    /// Fails with `DatasetInvalid` for an invalid data set and with
    /// `InvalidConfig` for unusable settings.
    pub fn new(mut dataset: CalibrationDataSet, config: &FitConfig) -> Result<Self> {
        if !dataset.is_valid() {
            return Err(CalibrationError::DatasetInvalid);
        }
        let (Some(temperature_range), Some(offset_range)) =
            (dataset.temperature_range(), dataset.offset_range())
        else {
            return Err(CalibrationError::DatasetInvalid);
        };

        let selection = CurveFitSelector::new(config.clone())?.select(&dataset)?;
        dataset.seal();

        Ok(Self {
            dataset,
            selection,
            temperature_range,
            offset_range,
        })
    }

    /// Offset at `temperature`, clamped to the calibrated range and rounded
    /// to 3 decimals.
    ///
    /// NaN is treated as the lowest calibrated temperature.
    pub fn offset(&self, temperature: f64) -> f64 {
        let (lo, hi) = self.temperature_range;
        let clamped = if temperature.is_nan() {
            lo
        } else {
            temperature.clamp(lo, hi)
        };
        round3(predict(&self.selection.model, clamped))
    }

    /// `offset` for many temperatures, evaluated in parallel.
    pub fn offsets(&self, temperatures: &[f64]) -> Vec<f64> {
        temperatures.par_iter().map(|&t| self.offset(t)).collect()
    }

    pub fn temperature_range(&self) -> (f64, f64) {
        self.temperature_range
    }

    pub fn offset_range(&self) -> (f64, f64) {
        self.offset_range
    }

    pub fn model(&self) -> &FittedModel {
        &self.selection.model
    }

    pub fn selection(&self) -> &FitSelection {
        &self.selection
    }

    pub fn dataset(&self) -> &CalibrationDataSet {
        &self.dataset
    }

    /// Unrounded model value and residual at each calibration point.
    pub fn residuals(&self) -> Vec<PointResidual> {
        self.dataset
            .points()
            .iter()
            .map(|&point| {
                let fitted = predict(&self.selection.model, point.temperature);
                PointResidual {
                    point,
                    fitted,
                    residual: point.offset - fitted,
                }
            })
            .collect()
    }
}

impl OffsetCorrection for OffsetEngine {
    fn offset(&self, temperature: f64) -> f64 {
        OffsetEngine::offset(self, temperature)
    }
}

fn round3(value: f64) -> f64 {
    // `+ 0.0` turns a rounded -0.0 into 0.0.
    (value * 1000.0).round() / 1000.0 + 0.0
}
