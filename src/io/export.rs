//! Export per-point calibration residuals to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::PointResidual;
use crate::error::{CalibrationError, Result};

/// Write `temperature,observed,fitted,residual` rows to `path`.
pub fn write_residuals_csv(path: &Path, residuals: &[PointResidual]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        CalibrationError::Export(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    write_rows(&mut writer, residuals)?;
    writer
        .flush()
        .map_err(|e| CalibrationError::Export(format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = residuals.len(), "wrote residual CSV");
    Ok(())
}

fn write_rows<W: std::io::Write>(writer: &mut csv::Writer<W>, residuals: &[PointResidual]) -> Result<()> {
    writer
        .write_record(["temperature", "observed", "fitted", "residual"])
        .map_err(|e| CalibrationError::Export(format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writer
            .write_record([
                r.point.temperature.to_string(),
                r.point.offset.to_string(),
                format!("{:.6}", r.fitted),
                format!("{:.6}", r.residual),
            ])
            .map_err(|e| CalibrationError::Export(format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalibrationPoint;

    #[test]
    fn writes_header_and_rows() {
        let residuals = vec![
            PointResidual {
                point: CalibrationPoint::new(30.0, 0.0),
                fitted: 0.0001,
                residual: -0.0001,
            },
            PointResidual {
                point: CalibrationPoint::new(40.0, -0.015),
                fitted: -0.0148,
                residual: -0.0002,
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("residuals.csv");
        write_residuals_csv(&path, &residuals).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "temperature,observed,fitted,residual");
        assert_eq!(lines[1], "30,0,0.000100,-0.000100");
        assert_eq!(lines[2], "40,-0.015,-0.014800,-0.000200");
    }
}
