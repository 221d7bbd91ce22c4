//! Validated calibration data.
//!
//! A `CalibrationDataSet` is built whole by one of the checked constructors
//! and never gains points afterwards. Every constructor produces the same
//! canonical form:
//!
//! - points sorted ascending by temperature
//! - no two points sharing a temperature
//! - `valid` decided once, from the point count, at construction
//!
//! Validity rule: a set is valid with **at least** `min_calibration_points`
//! distinct points. Every constructor applies the same rule.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::domain::{CalibrationPoint, FitConfig};
use crate::error::{CalibrationError, Result};
use crate::io::ingest::parse_blob;

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationDataSet {
    points: Vec<CalibrationPoint>,
    valid: bool,
    writable: bool,
}

impl CalibrationDataSet {
    /// An intentionally invalid placeholder with no points.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            valid: false,
            writable: true,
        }
    }

    /// Build from temperature/offset pairs in any order.
    ///
    /// Fails with `InsufficientPoints` below the configured minimum,
    /// `TypeMismatch` on non-finite values and `DuplicatePoint` when a
    /// temperature repeats.
    pub fn from_pairs(pairs: &[(f64, f64)], config: &FitConfig) -> Result<Self> {
        ensure_min_points(pairs.len(), config)?;

        let mut points = Vec::with_capacity(pairs.len());
        for (idx, &(temperature, offset)) in pairs.iter().enumerate() {
            if !(temperature.is_finite() && offset.is_finite()) {
                return Err(CalibrationError::type_mismatch(format!(
                    "point {} ({temperature}, {offset}) is not a pair of finite numbers",
                    idx + 1
                )));
            }
            points.push(CalibrationPoint::new(temperature, offset));
        }

        Self::from_points(points, config)
    }

    /// Build from a temperature -> offset mapping.
    ///
    /// Keys are temperatures written as text (JSON object keys are always
    /// strings); values must be JSON numbers. Keys that spell the same
    /// temperature differently (`"30"` and `"30.0"`) are rejected as
    /// duplicates.
    pub fn from_map(map: &Map<String, Value>, config: &FitConfig) -> Result<Self> {
        ensure_min_points(map.len(), config)?;

        let mut points = Vec::with_capacity(map.len());
        for (key, value) in map {
            let temperature = parse_real(key).ok_or_else(|| {
                CalibrationError::type_mismatch(format!("temperature key '{key}' is not a number"))
            })?;
            let offset = value
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    CalibrationError::type_mismatch(format!(
                        "offset for temperature '{key}' is not a number: {value}"
                    ))
                })?;
            points.push(CalibrationPoint::new(temperature, offset));
        }

        Self::from_points(points, config)
    }

    /// Build from a delimited text blob (`<temperature>,<offset>` per line).
    pub fn from_blob(text: &str, config: &FitConfig) -> Result<Self> {
        let pairs = parse_blob(text)?;
        Self::from_pairs(&pairs, config)
    }

    /// Build from a JSON value: an object is a mapping, an array is a list
    /// of `[temperature, offset]` pairs and a string is a text blob.
    pub fn from_value(value: &Value, config: &FitConfig) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_map(map, config),
            Value::Array(items) => {
                let pairs = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| json_pair(idx, item))
                    .collect::<Result<Vec<_>>>()?;
                Self::from_pairs(&pairs, config)
            }
            Value::String(text) => Self::from_blob(text, config),
            other => Err(CalibrationError::shape(format!(
                "expected an object, a list of pairs or a text blob, got {}",
                json_kind(other)
            ))),
        }
    }

    fn from_points(mut points: Vec<CalibrationPoint>, config: &FitConfig) -> Result<Self> {
        points.sort_by(|a, b| a.temperature.total_cmp(&b.temperature));
        if let Some(pair) = points
            .windows(2)
            .find(|w| w[0].temperature == w[1].temperature)
        {
            return Err(CalibrationError::DuplicatePoint {
                temperature: pair[1].temperature,
            });
        }

        let valid = points.len() >= config.min_calibration_points;
        Ok(Self {
            points,
            valid,
            writable: true,
        })
    }

    /// All calibrated temperatures, ascending.
    pub fn temperatures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.temperature).collect()
    }

    /// Offsets in the same order as `temperatures()`.
    pub fn offsets(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.offset).collect()
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Make the set read-only. There is no way back.
    pub fn seal(&mut self) {
        self.writable = false;
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// `(min, max)` calibrated temperature, `None` for an empty set.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.temperature, last.temperature))
    }

    /// `(min, max)` calibrated offset, `None` for an empty set.
    pub fn offset_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.offset), hi.max(p.offset))
            });
        Some((min, max))
    }

    /// Canonical text blob for this set (one `temperature, offset` per line).
    pub fn to_blob(&self) -> String {
        crate::io::ingest::render_blob(&self.points)
    }
}

impl Default for CalibrationDataSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for CalibrationDataSet {
    type Err = CalibrationError;

    /// Parse a text blob using the default configuration.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_blob(s, &FitConfig::default())
    }
}

fn ensure_min_points(found: usize, config: &FitConfig) -> Result<()> {
    config.validate()?;
    if found < config.min_calibration_points {
        return Err(CalibrationError::InsufficientPoints {
            found,
            required: config.min_calibration_points,
        });
    }
    Ok(())
}

fn parse_real(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn json_pair(idx: usize, item: &Value) -> Result<(f64, f64)> {
    let Some(pair) = item.as_array() else {
        return Err(CalibrationError::shape(format!(
            "element {} is {}, expected a [temperature, offset] pair",
            idx + 1,
            json_kind(item)
        )));
    };
    if pair.len() != 2 {
        return Err(CalibrationError::shape(format!(
            "element {} has {} values, expected a [temperature, offset] pair",
            idx + 1,
            pair.len()
        )));
    }
    match (pair[0].as_f64(), pair[1].as_f64()) {
        (Some(t), Some(o)) => Ok((t, o)),
        _ => Err(CalibrationError::type_mismatch(format!(
            "element {} ({item}) is not numeric",
            idx + 1
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
