//! Error type shared by every stage of prediction.
//!
//! All failures are detected synchronously at the call that violates a
//! contract. Nothing is retried and nothing is partially applied: when an
//! operation returns an error, the tables it was handed are unchanged.

use crate::config::Precision;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PredictError>;

/// Errors raised while configuring a predictor, shaping tables, or computing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// Invalid configuration, or an operation needs state that was never bound.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Requested numeric precision is not one of single/double.
    #[error("unsupported precision: {0}")]
    UnsupportedPrecision(String),

    /// Requested prediction method is not implemented.
    #[error("unsupported prediction method: {0}")]
    UnsupportedMethod(String),

    /// Two shapes that must agree do not.
    #[error("dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `rows * cols` does not fit in `usize`.
    #[error("table of {rows}x{cols} elements overflows the addressable size")]
    DimensionOverflow { rows: usize, cols: usize },

    /// Model, input or result precision differs from the predictor's.
    #[error("precision mismatch: expected {expected}, got {actual}")]
    PrecisionMismatch {
        expected: Precision,
        actual: Precision,
    },

    /// Element access outside the table.
    #[error("element ({row}, {col}) is out of range for a {rows}x{cols} table")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Row block access outside the table.
    #[error("row range {start}..{end} is out of range for a table with {rows} rows")]
    RowRangeOutOfRange { start: usize, end: usize, rows: usize },

    /// The normal equations could not be solved.
    #[error("normal equations system is singular")]
    SingularSystem,
}

impl PredictError {
    pub(crate) fn unbound(what: &str) -> Self {
        Self::Configuration(format!("{what} is not bound"))
    }

    pub(crate) fn mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Fail with [`PredictError::DimensionMismatch`] unless `expected == actual`.
#[inline]
pub(crate) fn ensure_dim(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PredictError::mismatch(what, expected, actual))
    }
}
