//! Formatted terminal output.
//!
//! Formatting lives in one place so the fitting code stays clean and
//! output changes stay localized.

use crate::domain::{FitConfig, FittedModel, PointResidual};
use crate::engine::OffsetEngine;
use crate::fit::{AttemptOutcome, FallbackReason};

/// Full fit summary: data set, attempts, chosen model and residuals.
pub fn format_fit_summary(engine: &OffsetEngine, config: &FitConfig, source: &str) -> String {
    let mut out = String::new();
    let selection = engine.selection();
    let (t_min, t_max) = engine.temperature_range();
    let (o_min, o_max) = engine.offset_range();

    out.push_str("=== drift - thermal offset calibration ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Points: n={} | temperature=[{t_min:.2}, {t_max:.2}] | offset=[{o_min:.3}, {o_max:.3}]\n",
        engine.dataset().len()
    ));
    out.push_str(&format!(
        "Selection: terms {}..={} | min R²={} | anchor weight={}\n",
        config.min_poly_terms, config.max_poly_terms, config.min_r_squared, config.anchor_weight
    ));

    out.push_str("\nAttempts:\n");
    if selection.attempts.is_empty() {
        out.push_str("  (none)\n");
    }
    for attempt in &selection.attempts {
        match attempt.outcome {
            AttemptOutcome::Scored { r_squared } => out.push_str(&format!(
                "  degree {:<2} R²={r_squared:.6}\n",
                attempt.degree()
            )),
            AttemptOutcome::Unsolvable => {
                out.push_str(&format!("  degree {:<2} unsolvable\n", attempt.degree()))
            }
        }
    }

    out.push_str("\nChosen model:\n");
    out.push_str(&format!("- {}\n", engine.model().display_name()));
    match engine.model() {
        FittedModel::Polynomial { coefficients, .. } => {
            out.push_str(&format!("- coefficients (highest degree first): {}\n", fmt_vec(coefficients)));
        }
        FittedModel::Linear { points } => {
            out.push_str(&format!("- knots: {}\n", points.len()));
        }
    }
    if let Some(quality) = selection.quality {
        out.push_str(&format!(
            "- R²={:.6} | max |residual|={:.6}\n",
            quality.r_squared, quality.max_abs_residual
        ));
    }
    if let Some(reason) = selection.fallback {
        let why = match reason {
            FallbackReason::TooFewPoints => "too few points for a polynomial",
            FallbackReason::BelowThreshold => "no polynomial reached the R² threshold",
        };
        out.push_str(&format!("- fallback: {why}\n"));
    }

    out.push('\n');
    out.push_str(&format_residual_table(&engine.residuals()));
    out
}

/// Table of observed vs fitted offsets.
pub fn format_residual_table(residuals: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>12} {:>12} {:>12}\n",
        "temperature", "observed", "fitted", "residual"
    ));
    for r in residuals {
        out.push_str(&format!(
            "{:>12.3} {:>12.4} {:>12.4} {:>12.5}\n",
            r.point.temperature, r.point.offset, r.fitted, r.residual
        ));
    }
    out
}

/// `temperature,offset` lines for query output.
pub fn format_offsets(temperatures: &[f64], offsets: &[f64]) -> String {
    temperatures
        .iter()
        .zip(offsets.iter())
        .map(|(t, o)| format!("{t},{o:.3}\n"))
        .collect()
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6e}")).collect();
    format!("[{}]", parts.join(", "))
}
