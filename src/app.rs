//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - builds the calibration engine
//! - prints reports/plots and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CorrectArgs, FitArgs, OffsetArgs, PlotArgs};
use crate::engine::OffsetCorrection;
use crate::error::Result;

pub mod pipeline;

/// Entry point for the `drift` binary.
pub fn run() -> Result<()> {
    // A missing `.env` is normal; a malformed one is reported once logging is up.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Some(err) = dotenv_problem(&dotenv) {
        tracing::warn!(error = %err, "ignoring unreadable .env file");
    }

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Offset(args) => handle_offset(args),
        Command::Correct(args) => handle_correct(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// The `.env` error worth reporting, if any. A missing file is not one.
fn dotenv_problem<T>(result: &dotenvy::Result<T>) -> Option<&dotenvy::Error> {
    match result {
        Err(err) if !err.not_found() => Some(err),
        _ => None,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<()> {
    let config = args.calibration.fit_config();
    let run = pipeline::run_calibration(args.calibration.file.as_deref(), &config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.engine, &config, &run.source)
    );

    if !args.no_plot {
        let plot = crate::plot::render_engine_plot(&run.engine, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::export::write_residuals_csv(path, &run.engine.residuals())?;
    }
    if let Some(path) = &args.export_curve {
        crate::io::curve::write_curve_json(path, &run.engine, &config)?;
    }

    Ok(())
}

fn handle_offset(args: OffsetArgs) -> Result<()> {
    let config = args.calibration.fit_config();
    let run = pipeline::run_calibration(args.calibration.file.as_deref(), &config)?;

    let offsets = run.engine.offsets(&args.temperatures);
    print!("{}", crate::report::format_offsets(&args.temperatures, &offsets));
    Ok(())
}

fn handle_correct(args: CorrectArgs) -> Result<()> {
    let config = args.calibration.fit_config();
    let run = pipeline::run_calibration(args.calibration.file.as_deref(), &config)?;

    let (lo, hi) = run.engine.temperature_range();
    if args.temperature < lo || args.temperature > hi {
        tracing::warn!(
            temperature = args.temperature,
            lo,
            hi,
            "temperature outside calibrated range; offset is clamped"
        );
    }

    for raw in &args.measurements {
        let corrected = run.engine.correct(*raw, args.temperature);
        println!("{raw},{corrected:.4}");
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<()> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_curve_file_plot(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_file_is_not_reported() {
        let result = dotenvy::from_filename("no-such-drift-settings.env");
        assert!(result.is_err());
        assert!(dotenv_problem(&result).is_none());
        assert!(dotenv_problem(&Ok(())).is_none());
    }

    #[test]
    fn unreadable_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory opens but cannot be read as a file.
        let result = dotenvy::from_path(dir.path());
        assert!(dotenv_problem(&result).is_some());
    }
}
