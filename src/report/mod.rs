//! Reporting utilities: fit summaries, residual tables and query output.

pub mod format;

pub use format::*;
