//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit one polynomial order with anchored weighted least squares (`fitter`)
//! - walk orders from simple to complex and pick the first acceptable one (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
