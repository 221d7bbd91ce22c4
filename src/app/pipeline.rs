//! Shared "calibration pipeline" used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load calibration -> validate -> fit/select -> engine
//!
//! The subcommands can then focus on presentation.

use std::path::Path;

use crate::data::CalibrationDataSet;
use crate::domain::{DEFAULT_CALIBRATION_BLOB, FitConfig};
use crate::engine::OffsetEngine;
use crate::error::Result;
use crate::io::ingest::load_dataset;

/// A ready-to-query engine plus where its data came from.
#[derive(Debug, Clone)]
pub struct CalibrationRun {
    pub source: String,
    pub engine: OffsetEngine,
}

/// Load calibration data (or the built-in default) and build an engine.
pub fn run_calibration(file: Option<&Path>, config: &FitConfig) -> Result<CalibrationRun> {
    config.validate()?;

    let (source, dataset) = match file {
        Some(path) => (path.display().to_string(), load_dataset(path, config)?),
        None => (
            "built-in default calibration".to_string(),
            CalibrationDataSet::from_blob(DEFAULT_CALIBRATION_BLOB, config)?,
        ),
    };

    let engine = OffsetEngine::new(dataset, config)?;
    tracing::info!(
        source = %source,
        model = %engine.model().display_name(),
        "calibration ready"
    );

    Ok(CalibrationRun { source, engine })
}
