//! Command-line parsing for the thermal offset calibrator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.
//!
//! Every fit knob can also be supplied through a `DRIFT_*` environment
//! variable (a `.env` file in the working directory is loaded first).

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_ANCHOR_WEIGHT, DEFAULT_MAX_POLY_TERMS, DEFAULT_MIN_CALIBRATION_POINTS, DEFAULT_MIN_POLY_TERMS,
    DEFAULT_MIN_R_SQUARED, FitConfig,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "drift", version, about = "Thermal drift offset calibration")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a calibration, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Print the corrected offset for one or more temperatures.
    Offset(OffsetArgs),
    /// Remove thermal drift from raw measurements taken at one temperature.
    Correct(CorrectArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
}

/// Where the calibration comes from and how it is fitted.
#[derive(Debug, Args, Clone)]
pub struct CalibrationArgs {
    /// Calibration file: `temperature, offset` lines, or JSON with a `.json`
    /// extension. Defaults to the built-in calibration.
    #[arg(short, long, value_name = "PATH", env = "DRIFT_CALIBRATION_FILE")]
    pub file: Option<PathBuf>,

    /// Minimum number of distinct calibration points.
    #[arg(long, env = "DRIFT_MIN_CALIBRATION_POINTS", default_value_t = DEFAULT_MIN_CALIBRATION_POINTS)]
    pub min_calibration_points: usize,

    /// Minimum R² a polynomial must reach to be selected.
    #[arg(long, env = "DRIFT_MIN_R_SQUARED", default_value_t = DEFAULT_MIN_R_SQUARED)]
    pub min_r_squared: f64,

    /// Fewest polynomial coefficients to try (2 = straight line).
    #[arg(long, env = "DRIFT_MIN_POLY_TERMS", default_value_t = DEFAULT_MIN_POLY_TERMS)]
    pub min_poly_terms: usize,

    /// Most polynomial coefficients to try (also capped at points - 1).
    #[arg(long, env = "DRIFT_MAX_POLY_TERMS", default_value_t = DEFAULT_MAX_POLY_TERMS)]
    pub max_poly_terms: usize,

    /// Residual scale of the coldest calibration point.
    #[arg(long, env = "DRIFT_ANCHOR_WEIGHT", default_value_t = DEFAULT_ANCHOR_WEIGHT)]
    pub anchor_weight: f64,
}

impl CalibrationArgs {
    pub fn fit_config(&self) -> FitConfig {
        FitConfig {
            min_calibration_points: self.min_calibration_points,
            min_r_squared: self.min_r_squared,
            min_poly_terms: self.min_poly_terms,
            max_poly_terms: self.max_poly_terms,
            anchor_weight: self.anchor_weight,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub calibration: CalibrationArgs,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-point residuals to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the curve (model + fitted grid) to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct OffsetArgs {
    #[command(flatten)]
    pub calibration: CalibrationArgs,

    /// Temperatures to query.
    #[arg(required = true, allow_negative_numbers = true)]
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct CorrectArgs {
    #[command(flatten)]
    pub calibration: CalibrationArgs,

    /// Temperature at which the measurements were taken.
    #[arg(short, long, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Raw measurements to correct.
    #[arg(required = true, allow_negative_numbers = true)]
    pub measurements: Vec<f64>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Curve JSON file produced by `drift fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
