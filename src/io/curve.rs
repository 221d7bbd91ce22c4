//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a calibrated curve:
//! - selected model + coefficients (or the linear knots)
//! - fit quality, ranges and the configuration used
//! - a precomputed grid of engine outputs for quick plotting
//!
//! The schema is defined by `domain::CurveFile`. It is a diagnostic output:
//! engines are always rebuilt from calibration data, never from this file.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, CurveGrid, FitConfig};
use crate::engine::OffsetEngine;
use crate::error::{CalibrationError, Result};

/// Number of samples in the exported grid.
const GRID_POINTS: usize = 101;

/// Build the curve file contents for an engine.
pub fn build_curve_file(engine: &OffsetEngine, config: &FitConfig) -> CurveFile {
    let (t_min, t_max) = engine.temperature_range();
    let temperature = build_grid(t_min, t_max, GRID_POINTS);
    let offset = engine.offsets(&temperature);

    CurveFile {
        tool: "drift".to_string(),
        generated_at: Utc::now(),
        config: config.clone(),
        model: engine.model().clone(),
        fit_quality: engine.selection().quality,
        temperature_range: engine.temperature_range(),
        offset_range: engine.offset_range(),
        calibration: engine.dataset().points().to_vec(),
        grid: CurveGrid {
            temperature,
            offset,
        },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, engine: &OffsetEngine, config: &FitConfig) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        CalibrationError::Export(format!("Failed to create curve JSON '{}': {e}", path.display()))
    })?;

    let curve = build_curve_file(engine, config);
    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| CalibrationError::Export(format!("Failed to write curve JSON: {e}")))?;

    tracing::info!(path = %path.display(), "wrote curve JSON");
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile> {
    let file = File::open(path).map_err(|e| CalibrationError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_reader(file)
        .map_err(|e| CalibrationError::shape(format!("Invalid curve JSON '{}': {e}", path.display())))
}

fn build_grid(t_min: f64, t_max: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    if !(t_min.is_finite() && t_max.is_finite()) || t_max <= t_min {
        return vec![t_min; n];
    }
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            t_min + u * (t_max - t_min)
        })
        .collect()
}
