//! Error type shared by the library and the `drift` binary.
//!
//! Every failure is reported eagerly at construction time. Numerical trouble
//! while fitting a single polynomial degree is *not* an error: the selector
//! records it and moves on (see `fit::selection`).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// Input is not the expected container shape (e.g. a list element that
    /// is not a temperature/offset pair).
    #[error("Calibration data has the wrong shape: {context}")]
    ShapeMismatch { context: String },

    /// A temperature or offset is not a finite number.
    #[error("Calibration data must be numeric temperature/offset pairs: {context}")]
    TypeMismatch { context: String },

    #[error("Insufficient calibration points: found {found}, at least {required} required.")]
    InsufficientPoints { found: usize, required: usize },

    /// Only reachable through the list and text constructors (and through
    /// mapping keys that spell the same number twice).
    #[error("Duplicate calibration point at temperature {temperature}; all temperatures must be unique.")]
    DuplicatePoint { temperature: f64 },

    #[error("Calibration data set is not valid; build it with one of the checked constructors.")]
    DatasetInvalid,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to access '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Export failed: {0}")]
    Export(String),
}

impl CalibrationError {
    pub fn shape(context: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
        }
    }

    pub fn type_mismatch(context: impl Into<String>) -> Self {
        Self::TypeMismatch {
            context: context.into(),
        }
    }

    /// Process exit code used by the `drift` binary.
    ///
    /// - 2: unusable input, configuration or file access
    /// - 3: data that parsed but cannot be calibrated
    /// - 4: export failures
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ShapeMismatch { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidConfig(_)
            | Self::Io { .. } => 2,
            Self::InsufficientPoints { .. } | Self::DuplicatePoint { .. } | Self::DatasetInvalid => 3,
            Self::Export(_) => 4,
        }
    }
}

pub type Result<T, E = CalibrationError> = std::result::Result<T, E>;
