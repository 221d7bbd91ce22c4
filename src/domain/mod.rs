//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - calibration points and the fit configuration (`CalibrationPoint`, `FitConfig`)
//! - fit outputs (`FittedModel`, `FitQuality`, `PointResidual`)
//! - the curve export schema (`CurveFile`)

pub mod types;

pub use types::*;
