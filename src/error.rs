//! Error taxonomy for the statistics engine
//!
//! Every failure is a structured value returned to the caller. A comparison
//! or binning that is mathematically undefined is reported here rather than
//! as a misleading zero.

use thiserror::Error;

/// Errors raised by aggregation, comparison and binning
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data for file '{file_id}' / variant '{variant_id}': {runs} run(s) recorded, {warmup} discarded as warm-up")]
    InsufficientData {
        file_id: String,
        variant_id: String,
        runs: usize,
        warmup: usize,
    },

    #[error("Low sample size comparing '{variant_a}' vs '{variant_b}': {n} non-tied pair(s), need at least {required}")]
    LowSampleSize {
        variant_a: String,
        variant_b: String,
        n: usize,
        required: usize,
    },

    #[error("No files measured under both '{variant_a}' and '{variant_b}'")]
    NoOverlap { variant_a: String, variant_b: String },

    #[error("All {common} paired difference(s) between '{variant_a}' and '{variant_b}' are zero")]
    DegenerateComparison {
        variant_a: String,
        variant_b: String,
        common: usize,
    },

    #[error("Insufficient range for binning: need at least 2 values above 1, got {usable}")]
    InsufficientRange { usable: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// Short machine-readable tag used in skipped-entry reports
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InsufficientData { .. } => "insufficient_data",
            AnalysisError::LowSampleSize { .. } => "low_sample_size",
            AnalysisError::NoOverlap { .. } => "no_overlap",
            AnalysisError::DegenerateComparison { .. } => "degenerate_comparison",
            AnalysisError::InsufficientRange { .. } => "insufficient_range",
            AnalysisError::InvalidValue(_) => "invalid_value",
            AnalysisError::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
