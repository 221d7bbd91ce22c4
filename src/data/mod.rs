//! Calibration data handling.
//!
//! - `dataset`: validated, sorted, de-duplicated calibration points

pub mod dataset;

pub use dataset::*;
