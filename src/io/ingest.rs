//! Calibration ingest.
//!
//! This module turns external calibration data into the raw pairs the
//! `CalibrationDataSet` constructors validate:
//!
//! - the text blob format (`<temperature>,<offset>` per line)
//! - calibration files on disk (text blob, or JSON when the extension is `.json`)
//!
//! No fitting logic lives here.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::data::CalibrationDataSet;
use crate::domain::{CalibrationPoint, FitConfig};
use crate::error::{CalibrationError, Result};

/// Parse a calibration text blob into raw `(temperature, offset)` pairs.
///
/// Rules:
/// - blank lines (after trimming) are skipped
/// - each other line is split on its *first* comma
/// - both fields are trimmed and parsed as finite reals
///
/// Any non-conforming line fails the whole blob; the error names the
/// 1-based line number. Sorting and duplicate detection are left to
/// `CalibrationDataSet::from_pairs`.
pub fn parse_blob(text: &str) -> Result<Vec<(f64, f64)>> {
    let mut pairs = Vec::new();
    for (idx, row) in text.split('\n').enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let line = idx + 1;
        let Some((temperature, offset)) = row.split_once(',') else {
            return Err(CalibrationError::shape(format!(
                "line {line} ('{}') is not a 'temperature, offset' pair",
                row.trim()
            )));
        };
        let temperature = parse_field(temperature, line, "temperature")?;
        let offset = parse_field(offset, line, "offset")?;
        pairs.push((temperature, offset));
    }
    Ok(pairs)
}

/// Render points in the blob format accepted by `parse_blob`.
///
/// `f64`'s `Display` is the shortest representation that parses back to the
/// same value, so a rendered blob reproduces the points exactly.
pub fn render_blob(points: &[CalibrationPoint]) -> String {
    let mut out = String::new();
    for p in points {
        out.push_str(&format!("{}, {}\n", p.temperature, p.offset));
    }
    out
}

/// Load and validate a calibration file.
///
/// `.json` files may hold an object (temperature -> offset), a list of
/// `[temperature, offset]` pairs or a string blob. Any other file is read
/// as a text blob.
pub fn load_dataset(path: &Path, config: &FitConfig) -> Result<CalibrationDataSet> {
    let text = fs::read_to_string(path).map_err(|e| CalibrationError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let dataset = if is_json {
        let value: Value = serde_json::from_str(&text).map_err(|e| {
            CalibrationError::shape(format!("'{}' is not valid JSON: {e}", path.display()))
        })?;
        CalibrationDataSet::from_value(&value, config)?
    } else {
        CalibrationDataSet::from_blob(&text, config)?
    };

    tracing::debug!(
        path = %path.display(),
        points = dataset.len(),
        "loaded calibration data"
    );
    Ok(dataset)
}

fn parse_field(raw: &str, line: usize, name: &str) -> Result<f64> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CalibrationError::type_mismatch(format!("line {line}: {name} '{raw}' is not a number"))
        })
}
