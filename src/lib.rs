//! `drift-curves` library crate.
//!
//! Corrects a sensor's measured offset for thermal drift. A handful of
//! `(temperature, offset)` calibration points are validated, fitted with the
//! simplest adequate polynomial (or interpolated linearly when none is good
//! enough) and served through a clamped, rounded `offset(temperature)` query.
//!
//! ```
//! use drift_curves::{CalibrationDataSet, OffsetEngine};
//!
//! let data: CalibrationDataSet = "30, 0.0\n40, -0.015\n50, -0.033\n60, -0.056\n"
//!     .parse()
//!     .unwrap();
//! let engine = OffsetEngine::from_dataset(data).unwrap();
//! assert_eq!(engine.offset(10.0), engine.offset(30.0));
//! ```
//!
//! The binary (`drift`) is a thin wrapper around this library so that core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

pub use data::CalibrationDataSet;
pub use domain::{CalibrationPoint, FitConfig, FittedModel};
pub use engine::{OffsetCorrection, OffsetEngine};
pub use error::CalibrationError;
pub use fit::{CurveFitSelector, FitSelection};
